use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A wrapper type for DateTime<Utc> to implement the Schema trait
#[derive(Serialize, Deserialize, ToSchema)]
#[schema(value_type = String, format = "date-time", example = "2024-05-01T12:00:00Z")]
pub struct DateTimeWrapper(pub DateTime<Utc>);

/// A wrapper type for UUID to implement the Schema trait
#[derive(Serialize, Deserialize, ToSchema)]
#[schema(value_type = String, format = "uuid", example = "8f14e45f-ceea-467a-9575-5a7a1b2c3d4e")]
pub struct UuidWrapper(pub Uuid);

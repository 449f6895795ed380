use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer scheme referenced by `security(("bearer_auth" = []))`
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TravelGram API",
        version = "0.1.0",
        description = "Social travel sharing: profiles, posts, comments, notifications, images and AI helpers"
    ),
    paths(
        crate::routes::health::health_check,
        crate::auth::controller::register,
        crate::auth::controller::login,
        crate::user::controller::create_profile,
        crate::user::controller::get_profile,
        crate::user::controller::update_profile,
        crate::user::controller::follow,
        crate::user::controller::unfollow,
        crate::user::controller::search_users,
        crate::post::controller::create_post,
        crate::post::controller::get_feed,
        crate::post::controller::get_post,
        crate::post::controller::get_user_posts,
        crate::post::controller::like_post,
        crate::post::controller::unlike_post,
        crate::comment::controller::create_comment,
        crate::comment::controller::get_post_comments,
        crate::notification::controller::list_notifications,
        crate::notification::controller::mark_read,
        crate::notification::controller::mark_all_read,
        crate::images::controller::upload_image,
        crate::images::controller::get_user_images,
        crate::images::controller::get_image,
        crate::images::controller::delete_image,
        crate::images::controller::classify_image,
        crate::assistant::controller::get_recommendations
    ),
    components(
        schemas(
            crate::controller::ErrorResponse,
            crate::controller::MessageResponse,
            crate::routes::health::HealthResponse,
            crate::auth::controller::RegisterRequest,
            crate::auth::controller::LoginRequest,
            crate::auth::controller::AuthResponse,
            crate::user::model::UserProfile,
            crate::user::model::UserSummary,
            crate::user::model::CreateProfileRequest,
            crate::user::model::UpdateProfileRequest,
            crate::user::model::FollowResponse,
            crate::post::model::Post,
            crate::post::model::CreatePostRequest,
            crate::post::model::LikeResponse,
            crate::comment::model::Comment,
            crate::comment::model::CreateCommentRequest,
            crate::notification::model::NotificationType,
            crate::notification::model::Notification,
            crate::notification::model::NotificationListResponse,
            crate::notification::model::MarkAllReadResponse,
            crate::images::model::ImageRecord,
            crate::images::model::UploadResponse,
            crate::images::model::ImageListResponse,
            crate::images::model::DeleteResponse,
            crate::images::model::ClassifyResponse,
            crate::classifier::Classification,
            crate::assistant::controller::RecommendationsResponse,
            crate::schema_ext::DateTimeWrapper,
            crate::schema_ext::UuidWrapper
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "auth", description = "Account registration and sign-in"),
        (name = "users", description = "Profiles, follows and search"),
        (name = "posts", description = "Travel posts, feed and likes"),
        (name = "comments", description = "Post comments"),
        (name = "notifications", description = "Notification inbox; live delivery at /api/notifications/ws?token=<ID token>"),
        (name = "images", description = "Image storage and classification"),
        (name = "ai", description = "Gemini-backed travel assistant")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub mod controller;
pub mod model;
pub mod service;
pub mod upload;

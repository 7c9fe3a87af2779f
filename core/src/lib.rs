pub mod backup;
pub mod db;
pub mod error;
pub mod images;
pub mod mealdb;
pub mod models;
pub mod service;
pub mod stores;

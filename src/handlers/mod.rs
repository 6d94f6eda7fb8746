pub mod points;

pub use points::points_config;

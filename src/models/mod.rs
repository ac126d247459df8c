pub mod analytics;
pub mod chart;
pub mod feed;
pub mod feedback;
pub mod stats;

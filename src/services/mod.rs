pub mod analytics_service;
pub mod api_client;
pub mod chart_service;
pub mod feed_service;
pub mod feedback_service;
pub mod impact_stats_service;
pub mod local_log_service;
pub mod page_service;

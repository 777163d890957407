pub mod a001_service_catalog;
pub mod a002_consultation;
pub mod a003_visit_stats;

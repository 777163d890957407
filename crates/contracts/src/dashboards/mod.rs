pub mod d400_visit_stats;

pub mod u501_quote_wizard;
pub mod u502_consultation_admin;

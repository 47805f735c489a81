pub mod params;
pub mod record;
pub mod series;

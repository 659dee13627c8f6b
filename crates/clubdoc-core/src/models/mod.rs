pub mod cell;
pub mod context;
pub mod record;

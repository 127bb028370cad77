pub mod bracket;
pub mod theme;

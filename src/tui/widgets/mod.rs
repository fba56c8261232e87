pub mod form;
pub mod header;
pub mod overlay;
pub mod records;
pub mod statusbar;
pub mod tiles;

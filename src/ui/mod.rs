/// UI module exports
pub mod components;
pub mod editor;
pub mod options;
pub mod popup;

pub mod detection;
pub mod normalized_box;

pub mod drowsiness;
pub mod timer;

pub mod folders;
pub mod offers;

pub mod rescue;

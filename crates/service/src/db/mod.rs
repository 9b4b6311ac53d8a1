pub mod drink_store;

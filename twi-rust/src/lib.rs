pub mod twi;

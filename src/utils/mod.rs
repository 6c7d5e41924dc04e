//! Utility functions and types

pub mod data_loader;

pub use data_loader::{dataframe_to_dataset, dataset_to_dataframe, DataLoader, DataSaver};

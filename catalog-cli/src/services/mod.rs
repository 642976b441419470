// Business logic services layer
//
// This module contains the catalog operations shared by every command:
// loading, filtering and adding items.

pub mod catalog;

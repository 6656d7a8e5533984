pub mod servicecatalog;

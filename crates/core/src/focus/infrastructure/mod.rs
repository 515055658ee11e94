pub mod resolver_factory;

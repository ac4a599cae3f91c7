mod resolvers;

pub use resolvers::Resolvers;

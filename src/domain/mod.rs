// Domain layer - Core types shared by the planners and adapters

pub mod model;

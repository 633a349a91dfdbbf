// Domain layer: the basket aggregate and the ports of its collaborators.

pub mod model;
pub mod ports;

//! RPC transport for orders.

pub mod order;

/// Generated protobuf types and service traits.
pub mod proto {
    tonic::include_proto!("order.v1");
}

pub use order::GrpcOrderHandler;

// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod product {
    include!("product.rs");
    // product.tonic.rs is auto-included by product.rs
}

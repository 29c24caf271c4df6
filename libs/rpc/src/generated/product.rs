// @generated
// This file is @generated by prost-build.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Product {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub user_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub description: ::prost::alloc::string::String,
    #[prost(double, tag = "5")]
    pub price: f64,
    #[prost(int32, tag = "6")]
    pub qty: i32,
}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Meta {
    #[prost(uint64, tag = "1")]
    pub total_data: u64,
    #[prost(uint64, tag = "2")]
    pub total_page: u64,
    #[prost(uint32, tag = "3")]
    pub current_page: u32,
    #[prost(uint32, tag = "4")]
    pub limit: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProductInsertRequest {
    #[prost(string, tag = "1")]
    pub user_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub description: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(int32, tag = "5")]
    pub qty: i32,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ProductInsertResponse {
    #[prost(string, tag = "1")]
    pub msg: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ListProductRequest {
    /// Values below 1 fall back to page 1.
    #[prost(int32, tag = "1")]
    pub page: i32,
    /// Values below 1 fall back to 10.
    #[prost(int32, tag = "2")]
    pub limit: i32,
    /// Comma-separated ids; when non-empty, page and limit are ignored.
    #[prost(string, tag = "3")]
    pub product_ids: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListProductResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: ::prost::alloc::vec::Vec<Product>,
    #[prost(message, optional, tag = "2")]
    pub meta: ::core::option::Option<Meta>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ReduceProductItem {
    #[prost(string, tag = "1")]
    pub product_id: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub qty: i32,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ReduceProductsRequest {
    #[prost(message, repeated, tag = "1")]
    pub items: ::prost::alloc::vec::Vec<ReduceProductItem>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ReduceProductsResponse {
    #[prost(string, tag = "1")]
    pub msg: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub success: bool,
    /// First product that could not be reduced.
    #[prost(string, optional, tag = "3")]
    pub product_id: ::core::option::Option<::prost::alloc::string::String>,
}
include!("product.tonic.rs");
// @@protoc_insertion_point(module)

//! gRPC service implementation for Products

use async_trait::async_trait;
use domain_products::{
    CreateProduct, ListProducts, ListProductsQuery, Product, ProductError, ProductPage,
    ProductRepository, ProductService, ReduceOutcome, ReduceProducts, ReductionItem,
};
use rpc::product::product_service_server::{
    ProductService as ProductServiceRpc, ProductServiceServer,
};
use rpc::product::*;
use std::future::Future;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// gRPC implementation of `product.ProductService`
pub struct ProductGrpcService<R: ProductRepository> {
    service: ProductService<R>,
}

impl<R: ProductRepository> ProductGrpcService<R> {
    pub fn new(service: ProductService<R>) -> Self {
        Self { service }
    }
}

fn to_status(err: ProductError) -> Status {
    match err {
        ProductError::Validation(msg) => Status::invalid_argument(msg),
        ProductError::Unavailable(msg) => Status::unavailable(msg),
        ProductError::Database(msg) | ProductError::Internal(msg) => Status::internal(msg),
    }
}

fn product_to_proto(product: Product) -> rpc::product::Product {
    rpc::product::Product {
        id: product.id,
        user_id: product.user_id,
        name: product.name,
        description: product.description,
        price: product.price,
        qty: product.qty,
    }
}

fn page_to_proto(page: ProductPage) -> ListProductResponse {
    ListProductResponse {
        items: page.items.into_iter().map(product_to_proto).collect(),
        meta: Some(Meta {
            total_data: page.meta.total_data,
            total_page: page.meta.total_page,
            current_page: page.meta.current_page,
            limit: page.meta.limit,
        }),
    }
}

/// Same defaulting as the REST query string.
fn list_from_proto(req: ListProductRequest) -> ListProducts {
    ListProducts::from(ListProductsQuery {
        page: Some(i64::from(req.page)),
        limit: Some(i64::from(req.limit)),
        product_ids: Some(req.product_ids),
    })
}

#[async_trait]
impl<R: ProductRepository + 'static> ProductServiceRpc for ProductGrpcService<R> {
    async fn insert_product(
        &self,
        request: Request<ProductInsertRequest>,
    ) -> Result<Response<ProductInsertResponse>, Status> {
        let req = request.into_inner();

        let inserted = self
            .service
            .insert_product(CreateProduct {
                user_id: req.user_id,
                name: req.name,
                description: req.description,
                price: req.price,
                qty: req.qty,
            })
            .await
            .map_err(to_status)?;

        Ok(Response::new(ProductInsertResponse {
            msg: inserted.message(),
            id: inserted.id,
        }))
    }

    async fn list_product(
        &self,
        request: Request<ListProductRequest>,
    ) -> Result<Response<ListProductResponse>, Status> {
        let page = self
            .service
            .list_products(list_from_proto(request.into_inner()))
            .await
            .map_err(to_status)?;

        Ok(Response::new(page_to_proto(page)))
    }

    async fn reduce_products(
        &self,
        request: Request<ReduceProductsRequest>,
    ) -> Result<Response<ReduceProductsResponse>, Status> {
        let items = request
            .into_inner()
            .items
            .into_iter()
            .map(|item| ReductionItem {
                product_id: item.product_id,
                qty: item.qty,
            })
            .collect();

        let outcome = self
            .service
            .reduce_products(ReduceProducts { items })
            .await
            .map_err(to_status)?;

        let msg = outcome.message().to_string();
        let response = match outcome {
            ReduceOutcome::Reduced => ReduceProductsResponse {
                msg,
                success: true,
                product_id: None,
            },
            ReduceOutcome::InsufficientQuantity { product_id } => ReduceProductsResponse {
                msg,
                success: false,
                product_id: Some(product_id),
            },
        };
        Ok(Response::new(response))
    }
}

/// Serve `service` on `listener` until `shutdown` resolves.
///
/// Every call is traced with its method path, status and latency.
pub async fn serve<R, S>(
    listener: TcpListener,
    service: ProductGrpcService<R>,
    shutdown: S,
) -> Result<(), tonic::transport::Error>
where
    R: ProductRepository + 'static,
    S: Future<Output = ()> + Send,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Starting gRPC server on {}", addr);
    }

    Server::builder()
        .layer(
            TraceLayer::new_for_grpc()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .add_service(
            ProductServiceServer::new(service)
                .accept_compressed(CompressionEncoding::Zstd)
                .send_compressed(CompressionEncoding::Zstd),
        )
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_graphql::{Context, EmptySubscription, Error, Schema, http::GraphiQLSource};
use async_graphql_poem::GraphQL;
use poem::{
    Endpoint, EndpointExt, Result, Route, Server, get, handler,
    http::StatusCode,
    listener::TcpListener,
    web::{Data, Html, Json, Query},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    routing::{self, RouteQuery},
    services::{build::build_from_config, store::GraphStore},
    structures::{
        BuildConfig,
        plan::{GraphSummary, Plan},
    },
};

/// Shared state of the web layer.
pub struct AppState {
    pub store: GraphStore,
    /// Sources used by the `rebuild` mutation. `None` disables rebuilds.
    pub build: Option<BuildConfig>,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(store: GraphStore, build: Option<BuildConfig>, timeout: Duration) -> AppState {
        AppState {
            store,
            build,
            timeout,
        }
    }
}

/// Routes `query` on the current graph snapshot off the async workers.
///
/// Once `state.timeout` elapses the search is told to stop and the request
/// fails with [`crate::Error::Cancelled`].
pub async fn plan_route(
    state: &AppState,
    query: RouteQuery,
) -> Result<routing::Route, crate::Error> {
    let graph = state.store.snapshot();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();

    let task = tokio::task::spawn_blocking(move || routing::route(&graph, &query, &flag));

    match tokio::time::timeout(state.timeout, task).await {
        Ok(joined) => joined?,
        Err(_) => {
            warn!("Routing exceeded {}ms, cancelling", state.timeout.as_millis());
            cancel.store(true, Ordering::Relaxed);
            Err(crate::Error::Cancelled)
        }
    }
}

struct QueryRoot;

#[async_graphql::Object]
impl QueryRoot {
    async fn ping(&self) -> &str {
        "pong"
    }

    async fn graph(&self, ctx: &Context<'_>) -> Result<GraphSummary, Error> {
        let state = ctx.data::<Arc<AppState>>()?;
        Ok(GraphSummary::from(state.store.snapshot().as_ref()))
    }

    async fn plan(
        &self,
        ctx: &Context<'_>,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
    ) -> Result<Plan, Error> {
        let state = ctx.data::<Arc<AppState>>()?;
        let query = RouteQuery::new(from_lat, from_lng, to_lat, to_lng);

        Ok(plan_route(state, query).await?.into())
    }
}

struct MutationRoot;

#[async_graphql::Object]
impl MutationRoot {
    /// Refetches every configured source and swaps in the new graph.
    async fn rebuild(&self, ctx: &Context<'_>) -> Result<GraphSummary, Error> {
        let state = ctx.data::<Arc<AppState>>()?;
        let build = state
            .build
            .as_ref()
            .ok_or_else(|| Error::new("Rebuilding is not configured"))?;

        let graph = build_from_config(build).await?;
        let summary = GraphSummary::from(&graph);
        state.store.replace(graph);

        Ok(summary)
    }
}

#[derive(Debug, Deserialize)]
struct RouteParams {
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
}

/// Bare `[[lat, lon], ...]` route; an empty array means no route.
#[handler]
async fn route_json(
    Query(params): Query<RouteParams>,
    Data(state): Data<&Arc<AppState>>,
) -> Result<Json<Vec<[f64; 2]>>> {
    let query = RouteQuery::new(
        params.from_lat,
        params.from_lng,
        params.to_lat,
        params.to_lng,
    );

    match plan_route(state, query).await {
        Ok(route) => Ok(Json(route.as_pairs())),
        Err(e) => {
            let status = match &e {
                crate::Error::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
                crate::Error::NoNearbyPoint => StatusCode::NOT_FOUND,
                crate::Error::Cancelled => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(poem::Error::from_string(e.to_string(), status))
        }
    }
}

#[handler]
async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn app(state: Arc<AppState>) -> impl Endpoint {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state.clone())
        .finish();

    Route::new()
        .at("/graphql", GraphQL::new(schema))
        .at("/graphiql", get(graphiql))
        .at("/route", get(route_json))
        .data(state)
}

pub async fn server(state: Arc<AppState>, bind: &str) -> std::io::Result<()> {
    info!("Serving on {}", bind);
    Server::new(TcpListener::bind(bind.to_string()))
        .run(app(state))
        .await
}

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures_util::{Stream, StreamExt, stream};

use crate::bootstrap::app_context::AppContext;
use crate::domain::figures::figure::FigureEventKind;
use crate::presentation::http::auth::{self, Bearer};

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/events", get(stream_events))
        .with_state(ctx)
}

fn event_name(kind: FigureEventKind) -> &'static str {
    match kind {
        FigureEventKind::Created => "created",
        FigureEventKind::Updated => "updated",
        FigureEventKind::Deleted => "deleted",
    }
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Catalog change stream", content_type = "text/event-stream"))
)]
pub async fn stream_events(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;

    let initial = stream::iter(vec![Ok(Event::default().event("ready").data("{}"))]);
    let broadcast = ctx.subscribe_figure_events().filter_map(|ev| async move {
        let payload = serde_json::to_string(&ev.figure).ok()?;
        Some(Ok(Event::default().event(event_name(ev.kind)).data(payload)))
    });
    let merged = initial.chain(broadcast);
    let keepalive = KeepAlive::new()
        .interval(Duration::from_secs(25))
        .text(":\n");
    Ok(Sse::new(merged).keep_alive(keepalive))
}

//! HTTP handlers. Thin: parse the body, call the service, shape the JSON.

use crate::models::{CandidateEntry, LadderFix, LadderName, PromotionCandidate, RatingUpdateEntry};
use crate::service::LadderService;
use actix_web::{
    error::BlockingError,
    get, post,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use serde::Serialize;
use serde_json::Value;

pub type AppState = Data<LadderService>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct CandidatesResponse {
    success: bool,
    candidates: Vec<PromotionCandidate>,
}

#[derive(Serialize)]
struct FixPositionsResponse {
    success: bool,
    message: &'static str,
    results: Vec<LadderFix>,
}

fn failure(message: impl Into<String>) -> Value {
    serde_json::json!({ "success": false, "message": message.into() })
}

/// Run service work on the blocking pool. Ladder locks and store writes never run on the
/// async worker.
async fn blocking<F, R>(state: &AppState, f: F) -> Result<R, BlockingError>
where
    F: FnOnce(&LadderService) -> R + Send + 'static,
    R: Send + 'static,
{
    let state = state.clone();
    web::block(move || f(state.get_ref())).await
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pool-ladder",
    })
}

/// Players whose rating has outgrown their ladder.
#[get("/api/fargo/check-promotions")]
async fn api_check_promotions(state: AppState) -> HttpResponse {
    match blocking(&state, |s| s.check_promotion_candidates()).await {
        Ok(Ok(candidates)) if candidates.is_empty() => {
            HttpResponse::Ok().json(failure("No players found ready for promotion"))
        }
        Ok(Ok(candidates)) => HttpResponse::Ok().json(CandidatesResponse {
            success: true,
            candidates,
        }),
        Ok(Err(e)) => {
            log::error!("Error checking promotions: {}", e);
            HttpResponse::InternalServerError().json(failure("Error checking promotions"))
        }
        Err(e) => {
            log::error!("Error checking promotions: {}", e);
            HttpResponse::InternalServerError().json(failure("Error checking promotions"))
        }
    }
}

async fn fix_positions_response(state: &AppState) -> HttpResponse {
    let results = match blocking(state, |s| s.fix_positions()).await {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => {
            log::error!("Error fixing ladder positions: {}", e);
            return HttpResponse::InternalServerError()
                .json(failure("Error fixing ladder positions"));
        }
        Err(e) => {
            log::error!("Error fixing ladder positions: {}", e);
            return HttpResponse::InternalServerError()
                .json(failure("Error fixing ladder positions"));
        }
    };
    HttpResponse::Ok().json(FixPositionsResponse {
        success: true,
        message: "Ladder positions fixed",
        results,
    })
}

/// Promote the given candidates, or with `fixPositions` and no candidates, repair gaps.
#[post("/api/fargo/promote-players")]
async fn api_promote_players(state: AppState, body: Json<Value>) -> HttpResponse {
    let candidates = body.get("candidates").filter(|c| !c.is_null());
    // Entries without a usable id become CandidateEntry::Malformed; only a non-list fails here.
    let entries: Option<Vec<CandidateEntry>> =
        match candidates.map(|c| serde_json::from_value(c.clone())) {
            None => None,
            Some(Ok(entries)) => Some(entries),
            Some(Err(_)) => {
                log::warn!("Invalid promotion data provided");
                return HttpResponse::BadRequest()
                    .json(failure("Invalid promotion data provided."));
            }
        };
    let fix = body
        .get("fixPositions")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match entries {
        Some(entries) if !entries.is_empty() || !fix => {
            match blocking(&state, move |s| s.promote(&entries)).await {
                Ok(report) => HttpResponse::Ok().json(report),
                Err(e) => {
                    log::error!("Error promoting players: {}", e);
                    HttpResponse::InternalServerError().json(failure("Error promoting players"))
                }
            }
        }
        _ if fix => fix_positions_response(&state).await,
        _ => {
            log::warn!("Invalid promotion data provided");
            HttpResponse::BadRequest().json(failure("Invalid promotion data provided."))
        }
    }
}

#[get("/api/fargo/fix-ladder-positions")]
async fn api_fix_ladder_positions(state: AppState) -> HttpResponse {
    fix_positions_response(&state).await
}

/// Bulk rating update: `{ updates: [ { playerId, newRating } ] }`.
#[post("/api/fargo/fargo-update")]
async fn api_rating_update(state: AppState, body: Json<Value>) -> HttpResponse {
    let entries: Vec<RatingUpdateEntry> =
        match body.get("updates").map(|u| serde_json::from_value(u.clone())) {
            Some(Ok(entries)) => entries,
            _ => {
                return HttpResponse::BadRequest().json(failure("Invalid update data provided."))
            }
        };
    match blocking(&state, move |s| s.update_ratings(&entries)).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("Error updating ratings: {}", e);
            HttpResponse::InternalServerError().json(failure("Error updating ratings"))
        }
    }
}

/// Players of one ladder in position order.
#[get("/api/ladders/{ladder}/players")]
async fn api_ladder_players(state: AppState, path: Path<String>) -> HttpResponse {
    let ladder: LadderName = match path.parse() {
        Ok(l) => l,
        Err(e) => return HttpResponse::NotFound().json(failure(e.to_string())),
    };
    match blocking(&state, move |s| s.ladder_players(ladder)).await {
        Ok(Ok(players)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "ladder": ladder,
            "players": players,
        })),
        Ok(Err(e)) => {
            log::error!("Error fetching players: {}", e);
            HttpResponse::InternalServerError().json(failure("Error fetching players"))
        }
        Err(e) => {
            log::error!("Error fetching players: {}", e);
            HttpResponse::InternalServerError().json(failure("Error fetching players"))
        }
    }
}

/// Mount every route. Used by the binary and by the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_check_promotions)
        .service(api_promote_players)
        .service(api_fix_ladder_positions)
        .service(api_rating_update)
        .service(api_ladder_players);
}

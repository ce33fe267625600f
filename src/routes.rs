use actix_cors::Cors;
use actix_web::{get, post, put, web, HttpResponse};
use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::balance::compute_balance_from_group;
use crate::error::ApiError;
use crate::exchange::get_exchanges_from_group;
use crate::schemas::{DataJson, ExpenseJson, Group, GroupNameJson, GuidJson, MembersJson};
use crate::store::GroupStore;

type Store = web::Data<dyn GroupStore>;

#[get("/groups/{guid}")]
async fn get_group(store: Store, guid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let guid = guid.into_inner();
    match store.get(&guid).await? {
        Some(group) => Ok(HttpResponse::Ok().json(DataJson { data: group })),
        // Unknown groups answer with the empty store response, not a 404
        None => {
            warn!("Group {} not found", guid);
            Ok(HttpResponse::Ok().json(json!({})))
        }
    }
}

#[put("/groups/{guid}/expenses")]
async fn add_expense(
    store: Store,
    guid: web::Path<String>,
    json: web::Json<ExpenseJson>,
) -> Result<HttpResponse, ApiError> {
    let expense = json.into_inner().validate()?;
    let guid = guid.into_inner();
    let outcome = store.append_expense(&guid, &expense).await?;
    info!("Expense of {} by {} added to group {}", expense.amount, expense.payer, guid);
    Ok(HttpResponse::Ok().json(DataJson { data: outcome }))
}

#[put("/groups/{guid}/members")]
async fn set_members(
    store: Store,
    guid: web::Path<String>,
    json: web::Json<MembersJson>,
) -> Result<HttpResponse, ApiError> {
    let members = json.into_inner().validate()?;
    let guid = guid.into_inner();
    let outcome = store.replace_members(&guid, &members).await?;
    info!("Group {} now has {} members", guid, members.len());
    Ok(HttpResponse::Ok().json(DataJson { data: outcome }))
}

#[post("/groups")]
async fn add_group(store: Store, json: web::Json<GroupNameJson>) -> Result<HttpResponse, ApiError> {
    let group_name = json.into_inner().validate()?;
    let group = Group::new(Uuid::new_v4().to_string(), group_name);
    store.put(&group).await?;
    info!("Group {} created as {}", group.group_name, group.guid);
    Ok(HttpResponse::Ok().json(DataJson {
        data: GuidJson { guid: group.guid },
    }))
}

#[get("/groups/{guid}/balance")]
async fn get_balance(store: Store, guid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let group = store.get(&guid).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(DataJson {
        data: compute_balance_from_group(&group),
    }))
}

#[get("/groups/{guid}/exchanges")]
async fn get_exchanges(store: Store, guid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let group = store.get(&guid).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(DataJson {
        data: get_exchanges_from_group(&group),
    }))
}

/// Any origin, any header, any method.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_header()
        .allow_any_method()
}

/// Registers the group routes and the JSON body policy. Malformed bodies
/// are reported like any other invalid input.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("invalid request body: {}", err)).into()
    }))
    .service(add_group)
    .service(get_balance)
    .service(get_exchanges)
    .service(add_expense)
    .service(set_members)
    .service(get_group);
}

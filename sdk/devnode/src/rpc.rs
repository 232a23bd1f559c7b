use {
  crate::node::Devnode,
  axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json,
    Router,
  },
  fundraiser_client_sdk::{
    api::{
      BroadcastRejection,
      BroadcastResponse,
      DevContractCall,
      ReadOnlyRequest,
      ReadOnlyResponse,
      TxResult,
      TxStatusResponse,
    },
    TxId,
  },
  std::sync::Arc,
  tracing::warn,
};

/// The subset of the Stacks node API the fund-raiser client uses,
/// plus an unsigned submission endpoint for development.
pub fn router(node: Arc<Devnode>) -> Router {
  Router::new()
    .route(
      "/v2/contracts/call-read/:address/:name/:function",
      post(call_read),
    )
    .route("/v2/dev/contract-call", post(contract_call))
    .route("/extended/v1/tx/:txid", get(tx_status))
    .with_state(node)
}

async fn call_read(
  State(node): State<Arc<Devnode>>,
  Path((address, name, function)): Path<(String, String, String)>,
  Json(request): Json<ReadOnlyRequest>,
) -> Json<ReadOnlyResponse> {
  Json(node.call_read_only(&address, &name, &function, &request))
}

async fn contract_call(
  State(node): State<Arc<Devnode>>,
  Json(call): Json<DevContractCall>,
) -> Result<Json<BroadcastResponse>, (StatusCode, Json<BroadcastRejection>)> {
  match node.submit(&call) {
    Ok(txid) => Ok(Json(BroadcastResponse {
      txid: txid.to_string(),
    })),
    Err(e) => {
      warn!("rejected {}: {e}", call.function_name);
      Err((
        StatusCode::BAD_REQUEST,
        Json(BroadcastRejection {
          error: "transaction rejected".into(),
          reason: format!("{}: {e}", e.code()),
        }),
      ))
    }
  }
}

async fn tx_status(
  State(node): State<Arc<Devnode>>,
  Path(txid): Path<String>,
) -> Result<Json<TxStatusResponse>, StatusCode> {
  let txid: TxId = txid.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
  let record = node.transaction(&txid).ok_or(StatusCode::NOT_FOUND)?;

  let tx_result = record
    .result
    .as_ref()
    .map(TxResult::new)
    .transpose()
    .map_err(|e| {
      warn!("cannot serialize result of {txid}: {e}");
      StatusCode::INTERNAL_SERVER_ERROR
    })?;

  Ok(Json(TxStatusResponse {
    tx_id: txid.to_string(),
    tx_status: record.state.to_string(),
    tx_result,
    block_height: record.block_height,
  }))
}

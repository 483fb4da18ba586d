//! Send a CW721 query through the port and unwrap the FCD envelope

use serde::de::DeserializeOwned;

use super::error::FetchError;
use super::messages::{Cw721QueryMsg, QueryEnvelope};
use crate::ports::ContractQueryPort;

pub(crate) async fn run_query<P, T>(
    port: &P,
    contract_address: &str,
    msg: &Cw721QueryMsg,
) -> Result<T, FetchError>
where
    P: ContractQueryPort + ?Sized,
    T: DeserializeOwned,
{
    let query = msg.name();
    let payload = serde_json::to_value(msg).map_err(|e| FetchError::UnexpectedResponse {
        contract: contract_address.to_string(),
        query,
        reason: format!("Failed to encode query: {}", e),
    })?;

    let response = port
        .query_contract(contract_address, &payload)
        .await
        .map_err(|source| FetchError::RemoteQuery {
            contract: contract_address.to_string(),
            query,
            source,
        })?;

    let envelope: QueryEnvelope<T> =
        serde_json::from_value(response).map_err(|e| FetchError::UnexpectedResponse {
            contract: contract_address.to_string(),
            query,
            reason: e.to_string(),
        })?;

    Ok(envelope.result)
}

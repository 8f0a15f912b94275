use gloo_net::http::Request;
use route_walker_lib::{RouteCatalog, WalkConfig};

pub async fn make_request<ReturnType>(path: &str) -> Result<ReturnType, String>
where
    ReturnType: serde::de::DeserializeOwned,
{
    let response = Request::get(path).send().await
        .map_err(|err| format!("GET {path} failed: {err}"))?;

    if !response.ok() {
        return Err(format!("GET {path} returned {}", response.status()));
    }

    let binary = response.binary().await
        .map_err(|err| format!("GET {path} body: {err}"))?;

    bincode::deserialize::<ReturnType>(&binary)
        .map_err(|err| format!("GET {path} could not be decoded: {err}"))
}

pub async fn get_catalog() -> Result<RouteCatalog, String> {
    make_request("/routes").await
}

pub async fn get_config() -> Result<WalkConfig, String> {
    let config: WalkConfig = make_request("/config").await?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

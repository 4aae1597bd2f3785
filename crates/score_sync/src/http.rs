//! Remote store client over HTTP or HTTPS.
//!
//! Pushes are form-encoded POSTs to the endpoint itself; reads are GETs with
//! query parameters. Redirects are followed, switching to GET as browsers do
//! for 301/302/303.

use crate::errors::SyncError;
use crate::remote::{PushRequest, RemoteStore};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HOST, LOCATION};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use score_types::{
    GameSummary, LeagueInfo, PushForm, PushResponse, ResponseStatus, TeamInfo, WireState,
    MODE_GAMES_BY_LEAGUE, MODE_LEAGUES, MODE_TEAM_MASTER,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::{form_urlencoded, Url};

const MAX_REDIRECTS: usize = 5;

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Clone)]
pub struct HttpRemote {
    client: HttpClient,
    endpoint: Url,
}

impl HttpRemote {
    pub fn new(endpoint: &str) -> Result<Self, SyncError> {
        let endpoint = Url::parse(endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SyncError::InvalidEndpoint(format!(
                "unsupported scheme {}",
                endpoint.scheme()
            )));
        }
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build(connector),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_with(&self, pairs: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(pairs);
        url
    }

    async fn send(
        &self,
        mut method: Method,
        mut url: Url,
        mut body: Option<String>,
    ) -> Result<Bytes, SyncError> {
        for _ in 0..=MAX_REDIRECTS {
            let request = build_request(method.clone(), &url, body.clone())?;
            let response = self.client.request(request).await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok());
                if let Some(location) = location {
                    url = url.join(location)?;
                    if !matches!(
                        status,
                        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
                    ) {
                        method = Method::GET;
                        body = None;
                    }
                    continue;
                }
            }

            if !status.is_success() {
                return Err(SyncError::Status(status));
            }
            return Ok(response.into_body().collect().await?.to_bytes());
        }

        Err(SyncError::InvalidEndpoint(format!(
            "too many redirects from {}",
            self.endpoint
        )))
    }
}

impl RemoteStore for HttpRemote {
    async fn push(&self, request: &PushRequest) -> Result<(), SyncError> {
        let form = encode_push(request)?;
        let body = self
            .send(Method::POST, self.endpoint.clone(), Some(form))
            .await?;
        parse_push_response(&body)
    }

    async fn fetch(&self, game_id: &str) -> Result<Option<WireState>, SyncError> {
        let url = self.url_with(&[("gameId", game_id)]);
        let body = self.send(Method::GET, url, None).await?;
        decode_state(&body)
    }

    async fn leagues(&self) -> Result<Vec<LeagueInfo>, SyncError> {
        let url = self.url_with(&[("mode", MODE_LEAGUES)]);
        decode_list(&self.send(Method::GET, url, None).await?)
    }

    async fn team_master(&self) -> Result<Vec<TeamInfo>, SyncError> {
        let url = self.url_with(&[("mode", MODE_TEAM_MASTER)]);
        decode_list(&self.send(Method::GET, url, None).await?)
    }

    async fn games_by_league(&self, league_id: &str) -> Result<Vec<GameSummary>, SyncError> {
        let url = self.url_with(&[("mode", MODE_GAMES_BY_LEAGUE), ("leagueId", league_id)]);
        decode_list(&self.send(Method::GET, url, None).await?)
    }
}

fn build_request(
    method: Method,
    url: &Url,
    body: Option<String>,
) -> Result<Request<Full<Bytes>>, SyncError> {
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|e| SyncError::InvalidEndpoint(format!("{url}: {e}")))?;

    let mut builder = Request::builder().method(method).uri(&uri);
    if let Some(authority) = uri.authority() {
        builder = builder.header(HOST, authority.as_str());
    }

    let request = match body {
        Some(form) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from(form)))?,
        None => builder.body(Full::new(Bytes::new()))?,
    };
    Ok(request)
}

fn encode_push(request: &PushRequest) -> Result<String, SyncError> {
    let form = PushForm {
        game_id: request.game_id.clone(),
        state: serde_json::to_string(&request.state)?,
        action: request.action.clone(),
        log_data: request
            .log
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
    };

    let mut encoder = form_urlencoded::Serializer::new(String::new());
    encoder.append_pair("gameId", &form.game_id);
    encoder.append_pair("state", &form.state);
    if let Some(action) = &form.action {
        encoder.append_pair("action", action);
    }
    if let Some(log_data) = &form.log_data {
        encoder.append_pair("logData", log_data);
    }
    Ok(encoder.finish())
}

fn parse_push_response(body: &[u8]) -> Result<(), SyncError> {
    match serde_json::from_slice::<PushResponse>(body) {
        Ok(PushResponse {
            status: ResponseStatus::Success,
            ..
        }) => Ok(()),
        Ok(PushResponse { message, .. }) => Err(SyncError::Rejected(
            message.unwrap_or_else(|| "no reason given".to_string()),
        )),
        // Older deployments answer with plain text.
        Err(_) if String::from_utf8_lossy(body).contains("success") => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn error_message(value: &Value) -> Option<String> {
    let error = value.as_object()?.get("error")?;
    Some(match error.as_str() {
        Some(message) => message.to_string(),
        None => error.to_string(),
    })
}

fn decode_state(body: &[u8]) -> Result<Option<WireState>, SyncError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)?;
    if value.is_null() || error_message(&value).is_some() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

fn decode_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, SyncError> {
    let value: Value = serde_json::from_slice(body)?;
    if let Some(message) = error_message(&value) {
        return Err(SyncError::Rejected(message));
    }
    Ok(serde_json::from_value(value)?)
}

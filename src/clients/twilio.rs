// src/clients/twilio.rs
//
// Transporte de SMS via a API REST do provedor de telefonia.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::common::error::AppError;

// Trait no limite com o provedor, para os testes injetarem um
// transporte falso. Retorna o id da mensagem no provedor.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(base_url: &str, account_sid: &str, auth_token: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Falha ao construir o cliente HTTP do Twilio");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl SmsTransport for TwilioClient {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let params = [("From", from), ("To", to), ("Body", body)];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "Twilio rejeitou o envio de SMS ({}): {}",
                status, detail
            )));
        }

        let data: Value = response.json().await?;
        let sid = data
            .get("sid")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(sid)
    }
}

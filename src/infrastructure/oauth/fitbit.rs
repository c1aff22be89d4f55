use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const FITBIT_AUTHORIZE_URL: &str = "https://www.fitbit.com/oauth2/authorize";
const FITBIT_API_BASE_URL: &str = "https://api.fitbit.com";

/// Scopes requested during authorization, matching what the Fitbit app
/// registration grants this bridge.
const OAUTH_SCOPES: &str = "profile settings location heartrate activity weight sleep nutrition";

/// Requested token lifetime: one week, in seconds.
const TOKEN_EXPIRES_IN_SECS: u32 = 604_800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitbitTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub token_type: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStepsSample {
    #[serde(rename = "dateTime")]
    pub date: String,
    /// Step total in the provider's original string form.
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsSeries {
    #[serde(rename = "activities-steps")]
    pub steps: Vec<DailyStepsSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateSample {
    #[serde(rename = "dateTime")]
    pub date: String,
    pub value: HeartRateValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateValue {
    /// Absent on days without enough wear time; decodes to 0.
    #[serde(rename = "restingHeartRate", default)]
    pub resting_heart_rate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateSeries {
    #[serde(rename = "activities-heart")]
    pub days: Vec<HeartRateSample>,
}

pub struct FitbitClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl FitbitClient {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            api_base_url: FITBIT_API_BASE_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Point API calls at a different host. Used by tests to stand in a
    /// mock server for api.fitbit.com.
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    /// Generate the Fitbit OAuth authorization URL
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&expires_in={}",
            FITBIT_AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
            TOKEN_EXPIRES_IN_SECS
        )
    }

    /// Exchange an authorization code for an access/refresh token pair
    pub async fn exchange_code(&self, code: &str) -> AppResult<FitbitTokens> {
        let params = [
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .http_client
            .post(format!("{}/oauth2/token", self.api_base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream(format!(
                "token exchange failed: {}",
                error_text
            )));
        }

        response
            .json::<FitbitTokens>()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse token response: {}", e)))
    }

    /// Fetch the user's profile document.
    ///
    /// The body is passed through untouched as text; an unreadable body
    /// substitutes the empty string rather than failing the request.
    pub async fn get_profile(&self, access_token: &str) -> AppResult<String> {
        let response = self
            .http_client
            .get(format!("{}/1/user/-/profile.json", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("profile fetch failed: {}", e)))?;

        Ok(response.text().await.unwrap_or_default())
    }

    /// Fetch the trailing one-year daily step series ending today
    pub async fn get_daily_steps(&self, access_token: &str) -> AppResult<StepsSeries> {
        self.http_client
            .get(format!(
                "{}/1/user/-/activities/steps/date/today/1y.json",
                self.api_base_url
            ))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("steps fetch failed: {}", e)))?
            .json::<StepsSeries>()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse steps series: {}", e)))
    }

    /// Fetch the trailing one-year resting-heart-rate series ending today
    pub async fn get_resting_heart_rate(&self, access_token: &str) -> AppResult<HeartRateSeries> {
        self.http_client
            .get(format!(
                "{}/1/user/-/activities/heart/date/today/1y.json",
                self.api_base_url
            ))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("heart rate fetch failed: {}", e)))?
            .json::<HeartRateSeries>()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse heart rate series: {}", e)))
    }
}

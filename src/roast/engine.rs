use super::prompts::{FULL_PROMPT, TEASER_PROMPT};
use super::types::{FullCritique, RawFullCritique, RawTeaser, RoastAnalysis, TeaserCritique};
use crate::config::LlmConfig;
use crate::error::RoastError;
use crate::llm::{ChatOptions, ImageSource, Provider, ProviderMessage, create_provider};
use crate::media::detection::detect_image_mime;
use crate::utils::build_client_with_timeout;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Image handed to the engine.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Remote image the engine downloads itself before analysis.
    Url(String),
    Bytes { data: Vec<u8>, mime: String },
}

/// Runs the two-call critique protocol against a vision model.
pub struct CritiqueEngine {
    provider: Arc<dyn Provider>,
    http: reqwest::Client,
    model: String,
    teaser_max_tokens: u32,
    full_max_tokens: u32,
}

impl CritiqueEngine {
    pub fn new(provider: Arc<dyn Provider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            http: build_client_with_timeout(config.image_fetch_timeout_secs),
            model: config.model.clone(),
            teaser_max_tokens: config.teaser_max_tokens,
            full_max_tokens: config.full_max_tokens,
        }
    }

    /// Like [`CritiqueEngine::new`], but refuses providers that cannot read images.
    pub fn with_vision_provider(
        provider: Arc<dyn Provider>,
        config: &LlmConfig,
    ) -> Result<Self, RoastError> {
        if !provider.supports_vision() {
            return Err(RoastError::configuration(format!(
                "provider {} does not accept image input",
                provider.name()
            )));
        }
        Ok(Self::new(provider, config))
    }

    /// Build with the configured provider; fails when no model key is set.
    pub fn from_config(config: &LlmConfig) -> Result<Self, RoastError> {
        Self::with_vision_provider(create_provider(config)?, config)
    }

    pub async fn analyze(&self, image: ImageInput) -> Result<RoastAnalysis, RoastError> {
        let source = match image {
            ImageInput::Url(url) => self.fetch_image(&url).await?,
            ImageInput::Bytes { data, mime } => ImageSource::from_bytes(mime, &data),
        };

        tracing::info!(model = %self.model, "starting critique");
        let (teaser, full) = tokio::try_join!(
            self.teaser_critique(&source),
            self.full_critique(&source)
        )?;
        tracing::info!(grade = %teaser.grade, "critique complete");

        Ok(RoastAnalysis {
            grade: teaser.grade,
            partial_roast: teaser.partial_roast,
            full_roast: full,
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<ImageSource, RoastError> {
        tracing::debug!(url, "fetching image for analysis");
        let response = self.http.get(url).send().await.map_err(|error| {
            RoastError::upstream(format!("failed to fetch image for analysis: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoastError::upstream(format!(
                "failed to fetch image for analysis: status {status}"
            )));
        }

        let header_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
        let bytes = response.bytes().await.map_err(|error| {
            RoastError::upstream(format!("failed to read image for analysis: {error}"))
        })?;

        let mime = detect_image_mime(&bytes)
            .map(str::to_string)
            .or(header_mime.filter(|mime| mime.starts_with("image/")))
            .ok_or_else(|| RoastError::upstream("fetched content is not an image"))?;
        tracing::debug!(bytes = bytes.len(), mime = %mime, "image fetched");
        Ok(ImageSource::from_bytes(mime, &bytes))
    }

    async fn teaser_critique(&self, source: &ImageSource) -> Result<TeaserCritique, RoastError> {
        let raw: RawTeaser = self
            .request_json("teaser", TEASER_PROMPT, source, self.teaser_max_tokens)
            .await?;
        TeaserCritique::try_from(raw)
    }

    async fn full_critique(&self, source: &ImageSource) -> Result<FullCritique, RoastError> {
        let raw: RawFullCritique = self
            .request_json("full", FULL_PROMPT, source, self.full_max_tokens)
            .await?;
        FullCritique::try_from(raw)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        stage: &str,
        prompt: &str,
        source: &ImageSource,
        max_tokens: u32,
    ) -> Result<T, RoastError> {
        let messages = [ProviderMessage::user_with_image(prompt, source.clone())];
        let mut options = ChatOptions::new(self.model.clone()).with_max_tokens(max_tokens);
        // Without JSON mode the object is sliced out of the reply text below.
        if self.provider.capabilities().json_mode {
            options = options.json_object();
        }

        let response = self
            .provider
            .chat(&messages, &options)
            .await
            .map_err(|error| {
                tracing::error!(stage, error = %error, "model call failed");
                RoastError::upstream(format!("{stage} critique request failed: {error}"))
            })?;
        tracing::info!(
            stage,
            model = response.model.as_deref().unwrap_or(self.model.as_str()),
            tokens = response.total_tokens(),
            "critique call complete"
        );

        let json = extract_json_object(&response.text).ok_or_else(|| {
            RoastError::upstream(format!("{stage} critique did not contain a JSON object"))
        })?;
        serde_json::from_str(json).map_err(|error| {
            RoastError::upstream(format!("{stage} critique has an unexpected shape: {error}"))
        })
    }
}

/// Slice out the outermost `{...}` so code fences or stray prose around the
/// object do not break parsing.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ContentBlock, ProviderCapabilities, ProviderResponse, ResponseFormat};
    use crate::roast::Grade;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers by prompt: the teaser prompt mentions `partialRoast`.
    struct ScriptedProvider {
        teaser: String,
        full: String,
        capabilities: ProviderCapabilities,
        seen_images: Mutex<Vec<String>>,
        seen_formats: Mutex<Vec<ResponseFormat>>,
    }

    impl ScriptedProvider {
        fn new(teaser: impl Into<String>, full: impl Into<String>) -> Self {
            Self {
                teaser: teaser.into(),
                full: full.into(),
                capabilities: ProviderCapabilities::default(),
                seen_images: Mutex::new(Vec::new()),
                seen_formats: Mutex::new(Vec::new()),
            }
        }

        fn with_capabilities(mut self, vision: bool, json_mode: bool) -> Self {
            self.capabilities = ProviderCapabilities { vision, json_mode };
            self
        }
    }

    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            self.capabilities.clone()
        }

        fn chat<'a>(
            &'a self,
            messages: &'a [ProviderMessage],
            options: &'a ChatOptions,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
            Box::pin(async move {
                self.seen_formats.lock().unwrap().push(options.response_format);
                let mut is_teaser = false;
                for block in &messages[0].content {
                    match block {
                        ContentBlock::Text { text } => is_teaser = text.contains("partialRoast"),
                        ContentBlock::Image { source } => {
                            self.seen_images.lock().unwrap().push(source.to_url());
                        }
                    }
                }
                let body = if is_teaser { &self.teaser } else { &self.full };
                if body == "FAIL" {
                    anyhow::bail!("upstream exploded");
                }
                Ok(ProviderResponse::text_only(body.clone()))
            })
        }
    }

    fn full_json(grade: &str, recommendations: usize) -> String {
        let dim = json!({"grade": grade, "critique": "Solid enough."});
        let recs: Vec<String> = (1..=recommendations).map(|i| format!("Fix {i}")).collect();
        json!({
            "headline": dim,
            "valueProposition": dim,
            "visualHierarchy": dim,
            "cta": dim,
            "trustSignals": dim,
            "actionableRecommendations": recs,
        })
        .to_string()
    }

    fn engine(provider: ScriptedProvider) -> (CritiqueEngine, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let engine = CritiqueEngine::new(provider.clone(), &LlmConfig::default());
        (engine, provider)
    }

    fn png_input() -> ImageInput {
        ImageInput::Bytes {
            data: vec![0x89, b'P', b'N', b'G'],
            mime: "image/png".into(),
        }
    }

    #[tokio::test]
    async fn analyze_combines_both_calls() {
        let (engine, provider) = engine(ScriptedProvider::new(
            r#"{"grade":"C-","partialRoast":"Meh."}"#,
            full_json("B", 3),
        ));
        let analysis = engine.analyze(png_input()).await.unwrap();

        assert_eq!(analysis.grade, Grade::CMinus);
        assert_eq!(analysis.partial_roast, "Meh.");
        for (_, dimension) in analysis.full_roast.dimensions() {
            assert_eq!(dimension.grade, Grade::B);
        }
        assert_eq!(analysis.full_roast.actionable_recommendations.len(), 3);

        let seen = provider.seen_images.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|url| url.starts_with("data:image/png;base64,")));
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let (engine, _) = engine(ScriptedProvider::new(
            "```json\n{\"grade\":\"a\",\"partialRoast\":\"Clean.\"}\n```",
            format!("Here you go: {}", full_json("A-", 4)),
        ));
        let analysis = engine.analyze(png_input()).await.unwrap();
        assert_eq!(analysis.grade, Grade::A);
        assert_eq!(analysis.full_roast.headline.grade, Grade::AMinus);
    }

    #[tokio::test]
    async fn one_failed_call_fails_the_analysis() {
        let (engine, _) = engine(ScriptedProvider::new(
            r#"{"grade":"B","partialRoast":"Ok."}"#,
            "FAIL",
        ));
        let err = engine.analyze(png_input()).await.unwrap_err();
        assert!(matches!(err, RoastError::Upstream(_)));
        assert!(err.to_string().contains("full critique request failed"));
    }

    #[tokio::test]
    async fn prose_reply_is_upstream_error() {
        let (engine, _) = engine(ScriptedProvider::new(
            "I cannot grade this page.",
            full_json("B", 3),
        ));
        let err = engine.analyze(png_input()).await.unwrap_err();
        assert!(err.to_string().contains("did not contain a JSON object"));
    }

    #[tokio::test]
    async fn off_scale_grade_is_upstream_error() {
        let (engine, _) = engine(ScriptedProvider::new(
            r#"{"grade":"E","partialRoast":"Odd."}"#,
            full_json("B", 3),
        ));
        assert!(matches!(
            engine.analyze(png_input()).await,
            Err(RoastError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn url_input_is_downloaded_and_inlined() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shot.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
                    .insert_header("content-type", "application/octet-stream"),
            )
            .mount(&server)
            .await;

        let (engine, provider) = engine(ScriptedProvider::new(
            r#"{"grade":"B","partialRoast":"Ok."}"#,
            full_json("B", 3),
        ));
        engine
            .analyze(ImageInput::Url(format!("{}/shot.jpg", server.uri())))
            .await
            .unwrap();
        let seen = provider.seen_images.lock().unwrap();
        assert!(seen[0].starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn unreachable_image_is_upstream_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (engine, _) = engine(ScriptedProvider::new("{}", "{}"));
        let err = engine
            .analyze(ImageInput::Url(format!("{}/missing.png", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, RoastError::Upstream(_)));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn from_config_requires_key() {
        assert!(matches!(
            CritiqueEngine::from_config(&LlmConfig::default()),
            Err(RoastError::Configuration(_))
        ));
    }

    #[test]
    fn text_only_provider_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new("{}", "{}"));
        let err = CritiqueEngine::with_vision_provider(provider, &LlmConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, RoastError::Configuration(_)));
        assert!(err.to_string().contains("scripted"));

        let provider =
            Arc::new(ScriptedProvider::new("{}", "{}").with_capabilities(true, false));
        assert!(CritiqueEngine::with_vision_provider(provider, &LlmConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn json_mode_follows_provider_capabilities() {
        let provider = Arc::new(
            ScriptedProvider::new(r#"{"grade":"A","partialRoast":"Sharp."}"#, full_json("A", 3))
                .with_capabilities(true, true),
        );
        let engine =
            CritiqueEngine::with_vision_provider(provider.clone(), &LlmConfig::default()).unwrap();
        engine.analyze(png_input()).await.unwrap();
        assert_eq!(
            *provider.seen_formats.lock().unwrap(),
            vec![ResponseFormat::JsonObject, ResponseFormat::JsonObject]
        );

        let (engine, provider) = engine_with_text_mode();
        engine.analyze(png_input()).await.unwrap();
        assert!(
            provider
                .seen_formats
                .lock()
                .unwrap()
                .iter()
                .all(|format| *format == ResponseFormat::Text)
        );
    }

    fn engine_with_text_mode() -> (CritiqueEngine, Arc<ScriptedProvider>) {
        engine(
            ScriptedProvider::new(
                r#"Sure! {"grade":"B","partialRoast":"Ok."}"#,
                full_json("B", 3),
            )
            .with_capabilities(true, false),
        )
    }

    #[tokio::test]
    async fn non_image_download_is_upstream_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shot.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>Access denied</body></html>"),
            )
            .mount(&server)
            .await;

        let (engine, provider) = engine(ScriptedProvider::new("{}", "{}"));
        let err = engine
            .analyze(ImageInput::Url(format!("{}/shot.png", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, RoastError::Upstream(_)));
        assert!(err.to_string().contains("fetched content is not an image"));
        assert!(provider.seen_images.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn slow_image_download_times_out_as_upstream_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = LlmConfig {
            image_fetch_timeout_secs: 1,
            ..LlmConfig::default()
        };
        let provider = Arc::new(ScriptedProvider::new("{}", "{}"));
        let engine = CritiqueEngine::new(provider.clone(), &config);
        let err = engine
            .analyze(ImageInput::Url(format!("{}/slow.png", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, RoastError::Upstream(_)));
        assert!(err.to_string().contains("failed to fetch image"));
        assert!(provider.seen_images.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn slow_model_call_is_upstream_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "choices": [{"message": {"content": "{}"}}]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: format!("{}/v1", server.uri()),
            timeout_secs: 1,
            ..LlmConfig::default()
        };
        let engine = CritiqueEngine::from_config(&config).unwrap();
        let err = engine.analyze(png_input()).await.unwrap_err();
        assert!(matches!(err, RoastError::Upstream(_)));
        assert!(err.to_string().contains("critique request failed"));
    }

    #[test]
    fn extract_json_object_edges() {
        assert_eq!(extract_json_object("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}

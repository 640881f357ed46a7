use std::sync::Arc;

use reqwest::{Client, redirect::Policy};

use super::{config::Config, error::AppError, matcher::Matcher};

pub struct State {
    pub config: Config,
    pub matcher: Matcher,
    pub http: Client,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        // upstream redirects go back to the browser untouched
        let http = Client::builder()
            .redirect(Policy::none())
            .timeout(config.upstream_timeout)
            .build()?;

        let matcher = Matcher::new(config.guard_exclude.iter().cloned());

        Ok(Arc::new(Self {
            config,
            matcher,
            http,
        }))
    }
}

use busmap::prelude::*;

pub struct AppState {
    pub session: Session<Option<OpenRouteService>>,
    pub source: DataSource,
    pub config: Config,
}

impl AppState {
    pub async fn reload(&self) {
        self.session.reload(&self.source, &self.config).await;
    }
}

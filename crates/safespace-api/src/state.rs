//! Shared handler state.

use std::sync::Arc;

use safespace_analytics::Aggregator;
use safespace_crypto::EnvelopeCipher;
use safespace_detection::Classifier;
use safespace_storage::ReportStore;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReportStore>,
    pub classifier: Arc<Classifier>,
    pub cipher: Arc<EnvelopeCipher>,
    pub aggregator: Aggregator,
}

impl AppState {
    pub fn new(store: ReportStore, classifier: Classifier, cipher: EnvelopeCipher) -> Self {
        let store = Arc::new(store);
        Self {
            aggregator: Aggregator::new(Arc::clone(&store)),
            store,
            classifier: Arc::new(classifier),
            cipher: Arc::new(cipher),
        }
    }
}

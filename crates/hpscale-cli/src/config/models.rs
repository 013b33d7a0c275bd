use hpscale::core::io::layout::ResultsLayout;
use hpscale::core::models::instance::InstanceSet;
use hpscale::engine::config::ExperimentConfig;

pub struct AppConfig {
    pub experiment: ExperimentConfig,
    pub instances: InstanceSet,
    pub layout: ResultsLayout,
}

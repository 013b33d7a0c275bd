/// Values used when neither the config file, `--set`, nor a dedicated flag
/// provides a setting. They reproduce the published locked parameters.
pub struct DefaultsConfig {
    pub lengths: Vec<usize>,
    pub pilot_trials_per_length: usize,
    pub main_trials_per_length: usize,
    pub max_steps: usize,
    pub temperature: f64,
    pub pop_size: usize,
    pub forget_rate: f64,
    pub max_gen: usize,
    pub paradox_retention_rate: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lengths: vec![20, 30, 40, 50, 60],
            pilot_trials_per_length: 200,
            main_trials_per_length: 2000,
            max_steps: 10_000,
            temperature: 1.0,
            pop_size: 50,
            forget_rate: 0.3,
            max_gen: 100,
            paradox_retention_rate: 0.1,
        }
    }
}

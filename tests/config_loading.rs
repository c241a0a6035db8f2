//! Configuration loading through the library API.

use std::io::Write;

use ephemeral::{Config, SimError, Simulation};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_file_and_validate() {
    let file = write_config(
        r#"
[network]
size = 200
half_degree = 3.0

[game]
memory_length = 6
temptation = 1.4
stranger_trials = 2

[run]
steps = 5
seed = 11

[output]
path = "records.txt"
echo = false
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.network.size, 200);
    assert!((config.network.edge_probability() - 6.0 / 199.0).abs() < 1e-12);
    assert_eq!(config.game.memory_length, 6);
    assert_eq!(config.game.stranger_trials, 2);
    // Omitted keys fall back to defaults
    assert_eq!(config.game.cooperation_threshold, 0.5);
    assert_eq!(config.run.seed, Some(11));
    assert!(!config.output.echo);

    let mut sim = Simulation::new(&config).unwrap();
    assert_eq!(sim.steps_total(), 5);
    assert!(sim.topology().edge_count() > 0);
    assert!(sim.step().is_ok());
}

#[test]
fn test_loaded_file_with_bad_parameters_fails_validation() {
    let file = write_config("[network]\nsize = 5\nhalf_degree = 4.0\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(SimError::Config(_))));
    assert!(matches!(Simulation::new(&config), Err(SimError::Config(_))));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn test_from_env_reads_prefixed_variables() {
    std::env::set_var("EPHEMERAL_SIZE", "321");
    std::env::set_var("EPHEMERAL_SEED", "8");
    let config = Config::from_env();
    std::env::remove_var("EPHEMERAL_SIZE");
    std::env::remove_var("EPHEMERAL_SEED");

    assert_eq!(config.network.size, 321);
    assert_eq!(config.run.seed, Some(8));
    assert_eq!(config.game, Config::default().game);
}

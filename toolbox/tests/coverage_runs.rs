use anyhow::Result;
use ndarray::array;
use tempdir::TempDir;
use toolbox::{
    coverage::{CoverageConfig, CoverageTracker},
    io::track_runs,
    record::{BufferedRecorder, NullRecorder},
    stats::{save_median, Curves},
};

const RUN_1: &str = "timestep,env,x0,x1,x2
0,0,0.05,0.05,9.0
0,1,0.05,0.05,9.0
100,0,0.05,0.05,8.0
100,1,0.91,0.05,7.0
200,0,0.25,0.05,6.0
200,1,0.91,0.05,5.0
";

const RUN_2: &str = "timestep,env,x0,x1,x2
0,0,0.0,0.0,0.0
0,1,0.1,0.0,0.0
100,0,0.2,0.0,0.0
100,1,0.3,0.0,0.0
200,0,0.2,0.0,0.0
200,1,0.3,0.0,0.0
";

#[test]
fn test_coverage_runs_to_median() -> Result<()> {
    let dir = TempDir::new("toolbox")?;
    let inputs = vec![dir.path().join("run1.csv"), dir.path().join("run2.csv")];
    std::fs::write(&inputs[0], RUN_1)?;
    std::fs::write(&inputs[1], RUN_2)?;

    let config_path = dir.path().join("coverage.yaml");
    CoverageConfig::default()
        .slice(0, 2)
        .resolution(10.0)
        .n_threads(2)
        .save(&config_path)?;
    let tracker = CoverageTracker::new(CoverageConfig::load(&config_path)?)?;

    let mut records = BufferedRecorder::new();
    let curves = track_runs(&tracker, &inputs, &mut records)?;
    assert_eq!(records.len(), 2);
    let last = records.iter().last().unwrap();
    assert_eq!(last.get_scalar("coverage_final")?, 4.0);
    assert_eq!(last.get_array1("coverage")?, vec![2.0, 4.0, 4.0]);
    assert!(last.get_string("run")?.ends_with("run2.csv"));
    assert_eq!(curves.timesteps, array![0i64, 100, 200]);
    assert_eq!(curves.values, array![[1.0f32, 2.0, 3.0], [2.0, 4.0, 4.0]]);

    let runs_path = dir.path().join("runs.csv");
    curves.save_csv(&runs_path)?;
    let curves = Curves::load_csv(&runs_path)?;

    let dat_path = dir.path().join("coverage.dat");
    save_median(&curves, &dat_path, None, &[])?;
    let content = std::fs::read_to_string(&dat_path)?;
    assert_eq!(
        content.lines().collect::<Vec<_>>(),
        vec!["timestep med", "0 1.500", "100 3.000", "200 3.500"]
    );

    Ok(())
}

#[test]
fn test_runs_with_different_timesteps_are_rejected() -> Result<()> {
    let dir = TempDir::new("toolbox")?;
    let inputs = vec![dir.path().join("run1.csv"), dir.path().join("run2.csv")];
    std::fs::write(&inputs[0], RUN_1)?;
    std::fs::write(&inputs[1], RUN_2.replace("200,", "300,"))?;

    let tracker = CoverageTracker::new(CoverageConfig::default())?;
    assert!(track_runs(&tracker, &inputs, &mut NullRecorder::default()).is_err());

    // The first run was tracked before the second failed, yet nothing is written.
    let mut records = BufferedRecorder::new();
    assert!(track_runs(&tracker, &inputs, &mut records).is_err());
    assert!(records.is_empty());

    Ok(())
}

#[test]
fn test_inconsistent_env_count_is_rejected() -> Result<()> {
    let dir = TempDir::new("toolbox")?;
    let path = dir.path().join("run.csv");
    std::fs::write(&path, "timestep,env,x0,x1\n0,0,0.0,0.0\n0,1,1.0,1.0\n1,0,2.0,2.0\n")?;

    let tracker = CoverageTracker::new(CoverageConfig::default())?;
    assert!(track_runs(&tracker, &[path], &mut NullRecorder::default()).is_err());

    Ok(())
}

use crate::grid::GridPoint;
use serde::{Deserialize, Serialize};

/// Fixed settings of the downstream event generator invocation. Paths are
/// kept as plain strings because they name locations on the cluster, not on
/// the machine rendering the scripts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorCommand {
    pub executable: String,
    #[serde(rename = "lheDir")]
    pub lhe_dir: String,
    #[serde(rename = "outputDir")]
    pub output_dir: String,
    pub events: u32,
    #[serde(rename = "metMin")]
    pub met_min: u32,
    #[serde(rename = "phiMass")]
    pub phi_mass: f64,
    pub lambda: f64,
}

impl Default for GeneratorCommand {
    fn default() -> Self {
        Self {
            executable: "./monojet.exe".to_string(),
            lhe_dir: "/group/hepheno/hlou".to_string(),
            output_dir: "ZprimeEventsFixed".to_string(),
            events: 50_000,
            met_min: 0,
            phi_mass: 10.0,
            lambda: 5.0,
        }
    }
}

/// One grid point expanded into the generator's argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    pub point: GridPoint,
    pub executable: String,
    pub input_file: String,
    pub output_tag: String,
    pub arguments: Vec<String>,
}

impl JobDescriptor {
    pub fn new(generator: &GeneratorCommand, point: GridPoint) -> Self {
        let input_file = format!("{}/Zprime_{}.lhe", generator.lhe_dir, point.mass);
        let output_tag = format!(
            "{}/Zprime_MZ_{}_gX_1_gq_0p1_rinv_{}",
            generator.output_dir, point.mass, point.rinv
        );
        let arguments = vec![
            "-m".to_string(),
            "lhe".to_string(),
            "-Zprime".to_string(),
            "-w".to_string(),
            "-i".to_string(),
            input_file.clone(),
            "-metmin".to_string(),
            generator.met_min.to_string(),
            "-n".to_string(),
            generator.events.to_string(),
            "-phimass".to_string(),
            generator.phi_mass.to_string(),
            "-lambda".to_string(),
            generator.lambda.to_string(),
            "-v".to_string(),
            "-inv".to_string(),
            point.rinv.to_string(),
            "-o".to_string(),
            output_tag.clone(),
        ];

        Self {
            point,
            executable: generator.executable.clone(),
            input_file,
            output_tag,
            arguments,
        }
    }

    pub fn command_line(&self) -> String {
        let mut line = self.executable.clone();
        for argument in &self.arguments {
            line.push(' ');
            line.push_str(argument);
        }
        line
    }
}

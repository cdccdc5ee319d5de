use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::band::BandShifts;
use crate::codec;
use crate::config::CorrectionParams;
use crate::error::Result;
use crate::parallel::prelude::*;
use crate::raster::Raster;
use crate::white_balance::white_balance;

pub trait PipelineStage: Send + Sync {
    fn process(&self, raster: &Raster) -> Raster;
    fn get_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WhiteBalance;

impl PipelineStage for WhiteBalance {
    fn process(&self, raster: &Raster) -> Raster {
        white_balance(raster)
    }

    fn get_name(&self) -> &'static str {
        "WhiteBalance"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandCorrection {
    pub shifts: BandShifts,
}

impl PipelineStage for BandCorrection {
    fn process(&self, raster: &Raster) -> Raster {
        self.shifts.apply(raster)
    }

    fn get_name(&self) -> &'static str {
        "BandCorrection"
    }
}

/// The fixed balance then band-shift sequence.
pub struct Pipeline {
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    pub fn from_params(params: &CorrectionParams) -> Self {
        let mut stages: Vec<Box<dyn PipelineStage>> = Vec::with_capacity(2);
        if params.white_balance {
            stages.push(Box::new(WhiteBalance));
        }
        stages.push(Box::new(BandCorrection { shifts: params.shifts }));
        Pipeline { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.get_name()).collect()
    }

    #[instrument(skip_all, fields(height = raster.height(), width = raster.width()))]
    pub fn run(&self, raster: &Raster) -> Raster {
        let mut current: Option<Raster> = None;
        for stage in &self.stages {
            let now = Instant::now();
            let next = stage.process(current.as_ref().unwrap_or(raster));
            debug!("{} execution time: {:.2?}", stage.get_name(), now.elapsed());
            current = Some(next);
        }
        current.unwrap_or_else(|| raster.clone())
    }
}

pub fn correct(raster: &Raster, params: &CorrectionParams) -> Raster {
    Pipeline::from_params(params).run(raster)
}

/// Corrects independent images concurrently. Output order follows input order.
pub fn correct_batch(rasters: &[Raster], params: &CorrectionParams) -> Vec<Raster> {
    let pipeline = Pipeline::from_params(params);
    rasters.par_iter().map(|raster| pipeline.run(raster)).collect()
}

/// Decodes an uploaded image, corrects it and encodes the result as PNG.
pub fn correct_bytes(input: &[u8], params: &CorrectionParams) -> Result<Vec<u8>> {
    let now = Instant::now();
    let raster = codec::decode(input)?;
    let corrected = correct(&raster, params);
    let output = codec::encode_png(&corrected)?;
    info!(
        input_bytes = input.len(),
        output_bytes = output.len(),
        "corrected image in {:.2?}",
        now.elapsed()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::ShiftTriple;

    fn sample_raster() -> Raster {
        let pixels: Vec<_> = (0..48u8)
            .map(|i| [i * 2, 40 + i * 3, 60 + i * 4])
            .collect();
        Raster::from_pixels(6, 8, &pixels).unwrap()
    }

    fn sample_params() -> CorrectionParams {
        CorrectionParams {
            white_balance: true,
            shifts: BandShifts::new(
                ShiftTriple::new(10, 0, -10),
                ShiftTriple::new(5, -5, 0),
                ShiftTriple::new(-5, 0, 0),
            ),
        }
    }

    #[test]
    fn test_stage_order() {
        let pipeline = Pipeline::from_params(&sample_params());
        assert_eq!(pipeline.stage_names(), vec!["WhiteBalance", "BandCorrection"]);

        let params = CorrectionParams { white_balance: false, ..sample_params() };
        assert_eq!(Pipeline::from_params(&params).stage_names(), vec!["BandCorrection"]);
    }

    #[test]
    fn test_pipeline_matches_composed_stages() {
        let raster = sample_raster();
        let params = sample_params();
        let expected = params.shifts.apply(&white_balance(&raster));
        assert_eq!(correct(&raster, &params), expected);
    }

    #[test]
    fn test_balance_disabled() {
        let raster = sample_raster();
        let params = CorrectionParams { white_balance: false, ..sample_params() };
        assert_eq!(correct(&raster, &params), params.shifts.apply(&raster));
    }

    #[test]
    fn test_defaults_only_balance() {
        let raster = sample_raster();
        assert_eq!(correct(&raster, &CorrectionParams::default()), white_balance(&raster));
    }

    #[test]
    fn test_identity_params_return_input() {
        let raster = sample_raster();
        let params = CorrectionParams { white_balance: false, shifts: BandShifts::default() };
        assert_eq!(Pipeline::from_params(&params).run(&raster), raster);
    }

    #[test]
    fn test_deterministic() {
        let raster = sample_raster();
        let params = sample_params();
        assert_eq!(correct(&raster, &params), correct(&raster, &params));
    }

    #[test]
    fn test_batch_matches_single() {
        let rasters = vec![
            sample_raster(),
            Raster::filled(3, 3, [20, 90, 140]).unwrap(),
            Raster::filled(1, 1, [255, 0, 0]).unwrap(),
        ];
        let params = sample_params();
        let batch = correct_batch(&rasters, &params);
        assert_eq!(batch.len(), rasters.len());
        for (raster, corrected) in rasters.iter().zip(&batch) {
            assert_eq!(corrected, &correct(raster, &params));
        }
    }

    #[test]
    fn test_correct_bytes() {
        let raster = sample_raster();
        let params = sample_params();
        let input = codec::encode_png(&raster).unwrap();

        let output = correct_bytes(&input, &params).unwrap();
        assert_eq!(codec::decode(&output).unwrap(), correct(&raster, &params));
    }

    #[test]
    fn test_correct_bytes_rejects_garbage() {
        let err = correct_bytes(b"nope", &CorrectionParams::default()).unwrap_err();
        assert!(matches!(err, crate::error::CorrectionError::DecodeError(_)));
    }
}

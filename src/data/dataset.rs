use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;

use ndarray::{Array4, Axis};
use tracing::{debug, info};

use crate::data::dataset_config::DatasetConfig;
use crate::data::image::{load_image, ImageTensor};
use crate::data::record::ImageRecord;
use crate::error::EvalError;
use crate::Result;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Builds a dataset with the default worker count and prefetch depth.
///
/// Nothing is decoded here; images are read when batches are pulled.
pub fn prepare_dataset(
    records: Vec<ImageRecord>,
    img_size: u32,
    batch_size: usize,
) -> Result<BatchedDataset> {
    BatchedDataset::build(records, DatasetConfig::new(img_size, batch_size))
}

/// One batch of decoded images with their labels, in input row order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub images: Vec<ImageTensor>,
    pub labels: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Stacks the images into one `(n, height, width, 3)` array.
    pub fn to_array4(&self) -> Result<Array4<f32>> {
        let views: Vec<_> = self.images.iter().map(ImageTensor::view).collect();
        ndarray::stack(Axis(0), &views).map_err(|e| EvalError::ShapeMismatch(e.to_string()))
    }
}

/// A lazy, restartable sequence of batches over a fixed list of records.
///
/// Every call to [`BatchedDataset::iter`] starts a fresh traversal that
/// decodes every image again; decoded tensors are never cached across
/// traversals.
#[derive(Debug, Clone)]
pub struct BatchedDataset {
    records: Arc<[ImageRecord]>,
    config: DatasetConfig,
}

impl BatchedDataset {
    pub fn build(records: Vec<ImageRecord>, config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        info!(
            records = records.len(),
            batch_size = config.batch_size,
            img_size = config.img_size,
            workers = config.workers,
            "built batched dataset"
        );
        Ok(BatchedDataset { records: records.into(), config })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Labels of every record, in row order.
    pub fn labels(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Number of samples (not batches).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `ceil(len / batch_size)`.
    pub fn num_batches(&self) -> usize {
        self.records.len().div_ceil(self.config.batch_size)
    }

    /// Starts a new traversal.
    pub fn iter(&self) -> Batches {
        Batches {
            records: Arc::clone(&self.records),
            config: self.config,
            pool: None,
            next_batch: 0,
            dispatched: 0,
            slots: BTreeMap::new(),
        }
    }

    /// Decodes the single record at `index` on the calling thread.
    pub fn get(&self, index: usize) -> Result<(ImageTensor, usize)> {
        let record = self.records.get(index).ok_or_else(|| {
            EvalError::InvalidInput(format!(
                "sample index {} out of range for {} records",
                index,
                self.records.len()
            ))
        })?;
        let image = load_image(&record.path, self.config.img_size)?;
        Ok((image, record.label))
    }
}

impl<'a> IntoIterator for &'a BatchedDataset {
    type Item = Result<Batch>;
    type IntoIter = Batches;

    fn into_iter(self) -> Batches {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Pull-based traversal of a [`BatchedDataset`].
///
/// Decoding runs on a pool of worker threads started on the first pull.
/// Requesting batch `k` dispatches every record up to batch
/// `k + prefetch_batches`; finished images land in index-keyed slots so that
/// batches come out in row order no matter which worker finishes first.
/// Dropping the traversal stops the workers.
pub struct Batches {
    records: Arc<[ImageRecord]>,
    config: DatasetConfig,
    pool: Option<WorkerPool>,
    /// Index of the batch the next pull returns.
    next_batch: usize,
    /// Records handed to the pool so far (always a prefix of `records`).
    dispatched: usize,
    slots: BTreeMap<usize, Result<ImageTensor>>,
}

impl Batches {
    /// Blocks until the next batch is fully decoded.
    ///
    /// Returns `None` once every batch has been yielded. If any image of the
    /// batch fails to decode, the error of the lowest-index failure is
    /// returned for that batch; later batches can still be pulled.
    pub fn next_batch(&mut self) -> Option<Result<Batch>> {
        let n = self.records.len();
        let start = self.next_batch.saturating_mul(self.config.batch_size);
        if start >= n {
            return None;
        }
        let end = start.saturating_add(self.config.batch_size).min(n);
        let batch_idx = self.next_batch;
        self.next_batch += 1;
        Some(self.assemble(batch_idx, start, end))
    }

    fn assemble(&mut self, batch_idx: usize, start: usize, end: usize) -> Result<Batch> {
        // Saturates so that huge prefetch depths simply mean "everything".
        let window = batch_idx
            .saturating_add(1)
            .saturating_add(self.config.prefetch_batches)
            .saturating_mul(self.config.batch_size);
        self.dispatch_until(window.min(self.records.len()), batch_idx)?;

        let pool = self.pool.as_ref().ok_or(EvalError::WorkerDisconnected(batch_idx))?;
        while self.slots.range(start..end).count() < end - start {
            let (index, outcome) = pool.recv().ok_or(EvalError::WorkerDisconnected(batch_idx))?;
            self.slots.insert(index, outcome);
        }

        let mut images = Vec::with_capacity(end - start);
        let mut first_err = None;
        for index in start..end {
            match self.slots.remove(&index) {
                Some(Ok(image)) => images.push(image),
                Some(Err(e)) => {
                    first_err.get_or_insert(e);
                }
                None => return Err(EvalError::WorkerDisconnected(batch_idx)),
            }
        }
        if let Some(e) = first_err {
            debug!(batch = batch_idx, "batch failed: {}", e);
            return Err(e);
        }

        let labels = self.records[start..end].iter().map(|r| r.label).collect();
        debug!(batch = batch_idx, size = end - start, "assembled batch");
        Ok(Batch { images, labels })
    }

    /// Hands records `dispatched..limit` to the pool, starting it if needed.
    fn dispatch_until(&mut self, limit: usize, batch_idx: usize) -> Result<()> {
        let workers = self.config.workers.min(self.records.len()).max(1);
        let img_size = self.config.img_size;
        let pool = self
            .pool
            .get_or_insert_with(|| WorkerPool::spawn(workers, img_size, |path, size| load_image(path, size)));

        while self.dispatched < limit {
            let job = Job {
                index: self.dispatched,
                path: self.records[self.dispatched].path.clone(),
            };
            if !pool.submit(job) {
                return Err(EvalError::WorkerDisconnected(batch_idx));
            }
            self.dispatched += 1;
        }
        Ok(())
    }
}

impl Iterator for Batches {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.records.len().div_ceil(self.config.batch_size);
        let left = total.saturating_sub(self.next_batch);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Batches {}

// ---------------------------------------------------------------------------
// Worker pool
// ---------------------------------------------------------------------------

struct Job {
    index: usize,
    path: PathBuf,
}

type Outcome = (usize, Result<ImageTensor>);
type Decoder = fn(&Path, u32) -> Result<ImageTensor>;

/// Fixed set of decode threads sharing one job queue.
///
/// Jobs go in through an `mpsc` channel whose receiver is shared behind a
/// mutex; results come back tagged with their row index on a second channel.
struct WorkerPool {
    job_tx: Option<mpsc::Sender<Job>>,
    result_rx: mpsc::Receiver<Outcome>,
    stop_flag: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    fn spawn(workers: usize, img_size: u32, decode: Decoder) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<Outcome>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let stop_flag = Arc::new(AtomicBool::new(false));

        let handles = (0..workers)
            .map(|_| {
                let jobs = Arc::clone(&job_rx);
                let results = result_tx.clone();
                let stop = Arc::clone(&stop_flag);
                std::thread::spawn(move || worker_loop(&jobs, &results, &stop, img_size, decode))
            })
            .collect();

        debug!(workers, img_size, "started decode workers");
        WorkerPool {
            job_tx: Some(job_tx),
            result_rx,
            stop_flag,
            handles,
        }
    }

    /// Returns `false` if every worker has already exited.
    fn submit(&self, job: Job) -> bool {
        match &self.job_tx {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        }
    }

    /// Blocks for the next finished job; `None` once all workers are gone.
    fn recv(&self) -> Option<Outcome> {
        self.result_rx.recv().ok()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        // Closing the queue wakes idle workers.
        self.job_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        debug!("stopped decode workers");
    }
}

fn worker_loop(
    jobs: &Mutex<mpsc::Receiver<Job>>,
    results: &mpsc::Sender<Outcome>,
    stop: &AtomicBool,
    img_size: u32,
    decode: Decoder,
) {
    loop {
        let job = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        let Ok(job) = job else { break };
        if stop.load(Ordering::Relaxed) {
            break;
        }
        // A panicking decoder must still produce a result, or the batch
        // waiting on this index would block forever.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| decode(&job.path, img_size)))
            .unwrap_or_else(|payload| Err(EvalError::decode(job.path.clone(), panic_message(&*payload))));
        if results.send((job.index, outcome)).is_err() {
            break;
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("decoder panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("decoder panicked: {}", msg)
    } else {
        "decoder panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_jpegs(dir: &std::path::Path, n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| {
                let path = dir.join(format!("img_{}.jpg", i));
                RgbImage::from_pixel(12, 12, Rgb([(i * 20 % 256) as u8, 40, 90])).save(&path).unwrap();
                ImageRecord::new(path, i % 3)
            })
            .collect()
    }

    #[test]
    fn build_rejects_zero_batch_size() {
        let err = prepare_dataset(Vec::new(), 32, 0).unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfig(_)));
    }

    #[test]
    fn empty_dataset_yields_nothing() {
        let ds = prepare_dataset(Vec::new(), 8, 4).unwrap();
        assert_eq!(ds.num_batches(), 0);
        assert!(ds.iter().next().is_none());
    }

    #[test]
    fn bad_path_does_not_fail_at_build_time() {
        let records = vec![ImageRecord::new("/definitely/not/here.jpg", 0)];
        let ds = prepare_dataset(records, 8, 4).unwrap();
        let mut batches = ds.iter();
        assert!(matches!(batches.next_batch(), Some(Err(EvalError::Decode { .. }))));
        assert!(batches.next_batch().is_none());
    }

    #[test]
    fn batches_stack_into_nhwc_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_jpegs(dir.path(), 5);
        let ds = BatchedDataset::build(records, DatasetConfig::new(6, 2).with_workers(2)).unwrap();

        let sizes: Vec<usize> = ds.iter().map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let first = ds.iter().next().unwrap().unwrap();
        assert_eq!(first.to_array4().unwrap().dim(), (2, 6, 6, 3));
    }

    #[test]
    fn size_hint_tracks_remaining_batches() {
        let dir = tempfile::tempdir().unwrap();
        let ds = prepare_dataset(write_jpegs(dir.path(), 7), 4, 3).unwrap();
        let mut it = ds.iter();
        assert_eq!(it.len(), 3);
        it.next();
        assert_eq!(it.len(), 2);
    }

    #[test]
    fn get_decodes_one_sample() {
        let dir = tempfile::tempdir().unwrap();
        let ds = prepare_dataset(write_jpegs(dir.path(), 3), 5, 2).unwrap();
        let (img, label) = ds.get(2).unwrap();
        assert_eq!(img.shape(), (5, 5, 3));
        assert_eq!(label, 2);
        assert!(ds.get(3).is_err());
    }

    #[test]
    fn huge_prefetch_depth_dispatches_everything() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_jpegs(dir.path(), 5);

        let cfg = DatasetConfig::new(4, 2).with_prefetch(usize::MAX);
        let ds = BatchedDataset::build(records.clone(), cfg).unwrap();
        assert_eq!(ds.iter().filter(|b| b.is_ok()).count(), 3);

        let cfg = DatasetConfig::new(4, usize::MAX).with_prefetch(usize::MAX);
        let ds = BatchedDataset::build(records, cfg).unwrap();
        let sizes: Vec<usize> = ds.iter().map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![5]);
    }

    fn panicking_decoder(path: &Path, img_size: u32) -> Result<ImageTensor> {
        if path.ends_with("boom.jpg") {
            panic!("corrupt header");
        }
        load_image(path, img_size)
    }

    #[test]
    fn decoder_panic_becomes_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_jpegs(dir.path(), 2);
        let pool = WorkerPool::spawn(2, 4, panicking_decoder);

        assert!(pool.submit(Job { index: 0, path: dir.path().join("boom.jpg") }));
        assert!(pool.submit(Job { index: 1, path: records[1].path.clone() }));

        let mut outcomes: Vec<Outcome> = (0..2).map(|_| pool.recv().unwrap()).collect();
        outcomes.sort_by_key(|(i, _)| *i);
        match &outcomes[0].1 {
            Err(EvalError::Decode { reason, .. }) => assert!(reason.contains("corrupt header")),
            other => panic!("expected a decode error, got {:?}", other.as_ref().map(|t| t.shape())),
        }
        assert!(outcomes[1].1.is_ok());
    }
}

// THEORY:
// The `parallel_pipeline` module scales the engine across many images, not
// within one. A single filter invocation is deliberately sequential (the
// in-place blend pass is order-dependent), so the unit of parallelism is the
// whole image: a pool of worker tasks, each owning its own `RecolorPipeline`,
// pulls image tasks from a round-robin dispatcher and answers over oneshot
// channels.
//
// No buffer is ever shared between tasks — every image is moved into exactly
// one worker and moved back out with its outcome — so the sequential engine's
// "exclusive buffer ownership" contract holds per invocation with no locking.

use crate::pipeline::{Outcome, RecolorConfig, RecolorError, RecolorPipeline};
use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};

/// One image moving through the pool.
pub struct ImageTask {
    pub buffer: Vec<u8>,
    pub image_id: u64,
    result_sender: oneshot::Sender<Result<(Vec<u8>, Outcome), RecolorError>>,
}

/// A pool of worker tasks that recolor independent images concurrently.
pub struct RecolorPool {
    task_sender: mpsc::UnboundedSender<ImageTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
    next_image_id: std::sync::atomic::AtomicU64,
}

impl RecolorPool {
    /// Builds a pool with one worker per available CPU.
    pub fn new(config: RecolorConfig) -> Self {
        Self::with_workers(config, num_cpus::get().max(1))
    }

    pub fn with_workers(config: RecolorConfig, worker_count: usize) -> Self {
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<ImageTask>();
        let mut workers = Vec::with_capacity(worker_count);

        // One dispatcher fans tasks out round-robin to per-worker channels.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<ImageTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_index = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_index].send(task);
                worker_index = (worker_index + 1) % worker_senders.len();
            }
        });

        for mut worker_receiver in worker_receivers {
            let worker_config = config.clone();

            let worker = tokio::spawn(async move {
                let pipeline = RecolorPipeline::new(worker_config);

                while let Some(mut task) = worker_receiver.recv().await {
                    let result = pipeline
                        .recolor_in_place(&mut task.buffer)
                        .map(|outcome| (task.buffer, outcome));
                    let _ = task.result_sender.send(result);
                }
            });

            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
            next_image_id: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Recolors one image on the pool. The buffer moves into a worker and
    /// comes back blended (or unchanged) with the outcome.
    pub async fn recolor(
        &self,
        buffer: Vec<u8>,
    ) -> Result<(Vec<u8>, Outcome), RecolorError> {
        let (result_sender, result_receiver) = oneshot::channel();

        let task = ImageTask {
            buffer,
            image_id: self
                .next_image_id
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            result_sender,
        };

        // Both channel ends only fail once the pool has shut down.
        self.task_sender
            .send(task)
            .map_err(|_| RecolorError::PoolShutDown)?;

        result_receiver
            .await
            .map_err(|_| RecolorError::PoolShutDown)?
    }

    /// Recolors a batch of independent images concurrently and returns the
    /// results in submission order.
    pub async fn recolor_batch(
        &self,
        buffers: Vec<Vec<u8>>,
    ) -> Vec<Result<(Vec<u8>, Outcome), RecolorError>> {
        join_all(buffers.into_iter().map(|buffer| self.recolor(buffer))).await
    }

    /// Closes the intake and waits for every worker to drain.
    pub async fn shutdown(self) {
        drop(self.task_sender);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Rgb;

    fn solid_buffer(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            buffer.extend_from_slice(&rgba);
        }
        buffer
    }

    fn config(width: u32, height: u32, palette: Vec<Rgb>) -> RecolorConfig {
        RecolorConfig {
            image_width: width,
            image_height: height,
            palette,
        }
    }

    #[tokio::test]
    async fn batch_results_match_the_sequential_pipeline() {
        let palette = vec![(200, 40, 40), (40, 200, 40), (40, 40, 200)];
        let pool_config = config(8, 8, palette.clone());
        let pool = RecolorPool::with_workers(pool_config.clone(), 2);
        let sequential = RecolorPipeline::new(pool_config);

        let images = vec![
            solid_buffer(8, 8, [120, 168, 120, 255]),
            solid_buffer(8, 8, [168, 120, 120, 255]),
            solid_buffer(8, 8, [5, 5, 5, 255]),
        ];

        let expected: Vec<Vec<u8>> = images
            .iter()
            .map(|image| sequential.recolor(image).unwrap().0)
            .collect();

        let results = pool.recolor_batch(images).await;
        for (result, expected_buffer) in results.into_iter().zip(expected) {
            let (buffer, _) = result.unwrap();
            assert_eq!(buffer, expected_buffer);
        }

        pool.shutdown().await;
    }

    #[tokio::test]
    async fn pool_surfaces_buffer_size_errors() {
        let pool = RecolorPool::with_workers(
            config(8, 8, vec![(200, 40, 40), (40, 200, 40), (40, 40, 200)]),
            1,
        );

        let result = pool.recolor(vec![0u8; 3]).await;
        assert!(matches!(
            result,
            Err(RecolorError::BufferSizeMismatch { .. })
        ));

        pool.shutdown().await;
    }
}

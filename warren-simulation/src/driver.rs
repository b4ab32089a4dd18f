//! Run loops. Both drivers take the same tick count from a [`TickClock`]; they
//! differ only in whether the rabbits share one loop or get a thread each.

use crossbeam_channel::Sender as FrameSender;
use log::{info, trace, warn};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use warren_core::{Entity, Frame, Pacing, TickClock};
use warren_transport::{Transport, TransportError};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to publish frame: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Worker thread {0} panicked")]
    WorkerPanicked(String),
}

/// An entity handed back at the end of a run, with how many ticks it advanced.
#[derive(Debug)]
pub struct Completed<E> {
    pub entity: E,
    pub ticks: u64,
}

/// Advances every entity, then reports every entity, once per tick, all on the
/// calling thread. Entity order is preserved in both phases.
#[derive(Debug, Clone, Copy)]
pub struct SerialDriver {
    clock: TickClock,
    pacing: Pacing,
}

impl SerialDriver {
    pub fn new(clock: TickClock) -> Self {
        Self {
            clock,
            pacing: Pacing::Unpaced,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn run<E: Entity>(
        &self,
        mut entities: Vec<E>,
        transport: &mut Transport,
    ) -> Result<Vec<Completed<E>>, SimulationError> {
        let dt = self.clock.dt();
        info!(
            "serial run: {} entities for {} ticks of {}s",
            entities.len(),
            self.clock.ticks(),
            dt
        );

        let mut ticks = 0;
        for tick in self.clock.iter() {
            for entity in entities.iter_mut() {
                entity.advance(dt);
            }
            let elapsed = self.clock.elapsed(tick);
            for entity in &entities {
                transport.publish(&Frame {
                    tick,
                    elapsed,
                    report: entity.report(),
                })?;
            }
            ticks += 1;
            trace!("tick {} done at t={:.3}s", tick, elapsed);
            self.pacing.pause();
        }

        info!("serial run finished after {} ticks", ticks);
        Ok(entities
            .into_iter()
            .map(|entity| Completed { entity, ticks })
            .collect())
    }
}

/// One named worker thread per entity. Each worker owns its entity for the
/// whole run, so no locking is involved; frames come back over a channel and
/// are published from the calling thread in arrival order.
#[derive(Debug, Clone, Copy)]
pub struct ThreadedDriver {
    clock: TickClock,
    pacing: Pacing,
}

impl ThreadedDriver {
    pub fn new(clock: TickClock) -> Self {
        Self {
            clock,
            pacing: Pacing::Unpaced,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Blocks until every worker has run its full tick count.
    ///
    /// A publish failure does not stop the workers; the first one is returned
    /// after they have all been joined.
    pub fn run<E: Entity + 'static>(
        &self,
        entities: Vec<E>,
        transport: &mut Transport,
    ) -> Result<Vec<Completed<E>>, SimulationError> {
        info!(
            "threaded run: {} workers for {} ticks of {}s, pacing {:?}",
            entities.len(),
            self.clock.ticks(),
            self.clock.dt(),
            self.pacing
        );

        let (tx, rx) = crossbeam_channel::unbounded::<Frame>();
        let mut workers = Vec::with_capacity(entities.len());
        for entity in entities {
            match spawn_worker(entity, self.clock, self.pacing, tx.clone()) {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    drop(tx);
                    let finished = wind_down(workers, &rx);
                    warn!(
                        "worker spawn failed, {} already running worker(s) joined",
                        finished.len()
                    );
                    return Err(SimulationError::Spawn(err));
                }
            }
        }
        // Only the workers hold senders now, so the receive loop ends with them.
        drop(tx);

        let mut publish_error = None;
        for frame in rx.iter() {
            if publish_error.is_some() {
                continue;
            }
            if let Err(err) = transport.publish(&frame) {
                warn!("dropping remaining frames after publish failure: {}", err);
                publish_error = Some(err);
            }
        }

        let mut completed = Vec::with_capacity(workers.len());
        for (name, handle) in workers {
            match handle.join() {
                Ok(done) => completed.push(done),
                Err(_) => return Err(SimulationError::WorkerPanicked(name)),
            }
        }

        if let Some(err) = publish_error {
            return Err(err.into());
        }
        info!("threaded run finished, {} frames published", transport.published());
        Ok(completed)
    }
}

type Worker<E> = (String, JoinHandle<Completed<E>>);

fn spawn_worker<E: Entity + 'static>(
    entity: E,
    clock: TickClock,
    pacing: Pacing,
    frames: FrameSender<Frame>,
) -> std::io::Result<Worker<E>> {
    let name = format!("rabbit-{}", entity.report().kind.label().to_lowercase());
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || run_worker(entity, clock, pacing, frames))?;
    Ok((name, handle))
}

/// Lets already started workers finish after a failed start: their frames are
/// discarded and every joinable one is handed back. The caller must have
/// dropped its own sender, or the drain never ends.
fn wind_down<E>(
    workers: Vec<Worker<E>>,
    frames: &crossbeam_channel::Receiver<Frame>,
) -> Vec<Completed<E>> {
    for _ in frames.iter() {}
    workers
        .into_iter()
        .filter_map(|(name, handle)| match handle.join() {
            Ok(done) => Some(done),
            Err(_) => {
                warn!("worker thread {} panicked while winding down", name);
                None
            }
        })
        .collect()
}

fn run_worker<E: Entity>(
    mut entity: E,
    clock: TickClock,
    pacing: Pacing,
    frames: FrameSender<Frame>,
) -> Completed<E> {
    let mut ticks = 0;
    let mut connected = true;
    for tick in clock.iter() {
        entity.advance(clock.dt());
        let frame = Frame {
            tick,
            elapsed: clock.elapsed(tick),
            report: entity.report(),
        };
        if connected && frames.send(frame).is_err() {
            warn!(
                "{} lost its frame channel at tick {}, continuing without output",
                thread::current().name().unwrap_or("worker"),
                tick
            );
            connected = false;
        }
        ticks += 1;
        pacing.pause();
    }
    Completed { entity, ticks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::RandomHeadings;
    use crate::Rabbit;
    use std::time::{Duration, Instant};
    use warren_core::{Plane, RabbitKind, Report};
    use warren_transport::{MemorySender, Sender, TextSerializer};

    fn rabbits(seed: u64) -> Vec<Rabbit> {
        let plane = Plane::new(800.0, 600.0);
        vec![
            Rabbit::regular(
                plane,
                plane.center(),
                50.0,
                Box::new(RandomHeadings::seeded(seed)),
            ),
            Rabbit::albino(plane, 400.0, 50.0),
        ]
    }

    fn memory_transport() -> (Transport, MemorySender) {
        let sink = MemorySender::new();
        let transport = Transport::new(Box::new(TextSerializer), Box::new(sink.clone()));
        (transport, sink)
    }

    fn lines_for(lines: &[String], label: &str) -> Vec<String> {
        lines
            .iter()
            .filter(|line| line.starts_with(label))
            .cloned()
            .collect()
    }

    struct BrokenSender;

    impl Sender for BrokenSender {
        fn send(&mut self, _line: &str) -> Result<(), TransportError> {
            Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "closed",
            )))
        }
    }

    #[derive(Debug)]
    struct Exploding;

    impl Entity for Exploding {
        fn advance(&mut self, _dt: f64) {
            panic!("boom");
        }

        fn report(&self) -> Report {
            Report {
                kind: RabbitKind::Albino,
                position: warren_core::Position::new(0.0, 0.0),
            }
        }
    }

    #[test]
    fn serial_default_run_reports_two_hundred_ticks_each() {
        let (mut transport, sink) = memory_transport();
        let done = SerialDriver::new(TickClock::new(20.0, 0.1))
            .run(rabbits(5), &mut transport)
            .unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 400);
        assert_eq!(lines_for(&lines, "Regular Rabbit").len(), 200);
        assert_eq!(lines_for(&lines, "Albino Rabbit").len(), 200);
        assert!(done.iter().all(|c| c.ticks == 200));
        assert_eq!(transport.published(), 400);
    }

    #[test]
    fn serial_reports_regular_before_albino_each_tick() {
        let (mut transport, sink) = memory_transport();
        SerialDriver::new(TickClock::with_ticks(0.1, 3))
            .run(rabbits(5), &mut transport)
            .unwrap();

        let lines = sink.lines();
        for pair in lines.chunks(2) {
            assert!(pair[0].starts_with("Regular Rabbit Position: ("));
            assert!(pair[1].starts_with("Albino Rabbit Position: ("));
        }
        assert_eq!(lines[1], "Albino Rabbit Position: (405, 300)");
        assert_eq!(lines[3], "Albino Rabbit Position: (410, 300)");
        assert_eq!(lines[5], "Albino Rabbit Position: (415, 300)");
    }

    #[test]
    fn serial_albino_wraps_after_full_lap() {
        let (mut transport, _sink) = memory_transport();
        // From x=400, tick 80 lands exactly on the edge and wraps to 0; tick 81 is at 5.
        let done = SerialDriver::new(TickClock::with_ticks(0.1, 81))
            .run(rabbits(5), &mut transport)
            .unwrap();
        let albino = done[1].entity.report();
        assert!((albino.position.x - 5.0).abs() < 1e-6, "x = {}", albino.position.x);
        assert_eq!(albino.position.y, 300.0);
    }

    #[test]
    fn threaded_advances_same_ticks_as_serial() {
        let clock = TickClock::new(20.0, 0.1);

        let (mut serial_transport, serial_sink) = memory_transport();
        let serial = SerialDriver::new(clock)
            .run(rabbits(77), &mut serial_transport)
            .unwrap();

        let (mut threaded_transport, threaded_sink) = memory_transport();
        let threaded = ThreadedDriver::new(clock)
            .run(rabbits(77), &mut threaded_transport)
            .unwrap();

        assert_eq!(threaded.len(), 2);
        for (s, t) in serial.iter().zip(&threaded) {
            assert_eq!(s.ticks, clock.ticks());
            assert_eq!(t.ticks, clock.ticks());
            assert_eq!(s.entity.report(), t.entity.report());
        }

        // Interleaving may differ, but each rabbit's own sequence is identical.
        let serial_lines = serial_sink.lines();
        let threaded_lines = threaded_sink.lines();
        assert_eq!(threaded_lines.len(), serial_lines.len());
        for label in ["Regular Rabbit", "Albino Rabbit"] {
            assert_eq!(
                lines_for(&threaded_lines, label),
                lines_for(&serial_lines, label)
            );
        }
    }

    #[test]
    fn threaded_pacing_throttles_wall_clock_only() {
        let (mut transport, sink) = memory_transport();
        let start = Instant::now();
        let done = ThreadedDriver::new(TickClock::with_ticks(0.1, 3))
            .with_pacing(Pacing::Fixed(Duration::from_millis(10)))
            .run(rabbits(1), &mut transport)
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(done.iter().all(|c| c.ticks == 3));
        assert_eq!(sink.lines().len(), 6);
    }

    #[test]
    fn serial_pacing_throttles_wall_clock_only() {
        let (mut transport, sink) = memory_transport();
        let plane = Plane::new(800.0, 600.0);
        let start = Instant::now();
        let done = SerialDriver::new(TickClock::with_ticks(0.1, 3))
            .with_pacing(Pacing::Fixed(Duration::from_millis(10)))
            .run(vec![Rabbit::albino(plane, 400.0, 50.0)], &mut transport)
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(done[0].ticks, 3);
        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.lines()[2], "Albino Rabbit Position: (415, 300)");
    }

    #[test]
    fn wind_down_joins_started_workers_and_returns_entities() {
        let plane = Plane::new(800.0, 600.0);
        let (tx, rx) = crossbeam_channel::unbounded::<Frame>();
        let worker = spawn_worker(
            Rabbit::albino(plane, 400.0, 50.0),
            TickClock::with_ticks(0.1, 5),
            Pacing::Unpaced,
            tx.clone(),
        )
        .unwrap();
        assert_eq!(worker.0, "rabbit-albino");
        drop(tx);

        let done = wind_down(vec![worker], &rx);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticks, 5);
        assert_eq!(done[0].entity.report().position.x, 425.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn serial_stops_on_publish_failure() {
        let mut transport = Transport::new(Box::new(TextSerializer), Box::new(BrokenSender));
        let result = SerialDriver::new(TickClock::with_ticks(0.1, 5)).run(rabbits(1), &mut transport);
        assert!(matches!(result, Err(SimulationError::Transport(_))));
    }

    #[test]
    fn threaded_reports_publish_failure_after_join() {
        let mut transport = Transport::new(Box::new(TextSerializer), Box::new(BrokenSender));
        let result = ThreadedDriver::new(TickClock::with_ticks(0.1, 5)).run(rabbits(1), &mut transport);
        assert!(matches!(result, Err(SimulationError::Transport(_))));
    }

    #[test]
    fn threaded_surfaces_worker_panic() {
        let (mut transport, _sink) = memory_transport();
        let result = ThreadedDriver::new(TickClock::with_ticks(0.1, 2)).run(vec![Exploding], &mut transport);
        match result {
            Err(SimulationError::WorkerPanicked(name)) => assert_eq!(name, "rabbit-albino"),
            other => panic!("expected worker panic, got {:?}", other.map(|c| c.len())),
        }
    }
}

//! Run lifecycle: Idle -> Running -> Ended(cause) -> Running (revive) | Idle (restart)
//!
//! The controller owns the simulation state and the parameter store. Network
//! completions reach it only through the `SyncInbox`, which is drained at the
//! top of every tick, so a new configuration never lands mid-tick.

use crate::api::{ConfigSource, ConnectionStatus, OutcomeReport, SyncEvent, SyncInbox, SyncService};
use crate::consts::{FIRST_PIPE_MIN_LEAD, REVIVE_BURST};
use crate::error::{GameError, Result};
use crate::settings::{ClientSettings, RevivePolicy};
use crate::sim::{
    Arena, EffectColor, EndCause, GameState, ParameterStore, RunPhase, SessionState, TickInput,
    tick,
};

pub struct SessionController<S> {
    state: GameState,
    store: ParameterStore,
    service: S,
    inbox: SyncInbox,
    revive_policy: RevivePolicy,
    status: ConnectionStatus,
    /// Input collected since the last tick
    pending: TickInput,
    autopilot: bool,
}

impl<S: SyncService> SessionController<S> {
    pub fn new(service: S, settings: &ClientSettings, seed: u64) -> Self {
        let revive_policy = settings.revive_policy;
        Self {
            state: GameState::new(seed, Arena::default(), revive_policy.initial_credits()),
            store: ParameterStore::new(),
            service,
            inbox: SyncInbox::new(),
            revive_policy,
            status: ConnectionStatus::Connecting,
            pending: TickInput::default(),
            autopilot: false,
        }
    }

    /// Ask the backend for fresh parameters; the answer is applied on a later tick
    pub fn request_sync(&mut self) {
        if !self.store.is_ready() {
            self.status = ConnectionStatus::Connecting;
        }
        self.service.request_sync(self.inbox.clone());
    }

    pub fn inbox(&self) -> &SyncInbox {
        &self.inbox
    }

    /// Apply every queued network completion, oldest first.
    /// Returns the number of events handled.
    pub fn apply_pending_sync(&mut self) -> usize {
        let events = self.inbox.drain();
        let count = events.len();
        for event in events {
            self.apply_event(event);
        }
        count
    }

    fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Config {
                source: ConfigSource::Fallback,
                ..
            } if self.store.is_ready() => {
                // A failed resync never replaces a working configuration
                log::warn!("Resync failed, keeping current configuration");
                if self.status == ConnectionStatus::Online {
                    self.status = ConnectionStatus::Offline;
                }
            }
            SyncEvent::Config { config, source } => {
                match self.store.apply_remote_config(&config) {
                    Ok(()) => {
                        self.status = match source {
                            ConfigSource::Live => ConnectionStatus::Online,
                            ConfigSource::Fallback => ConnectionStatus::Fallback,
                        };
                        log::info!(
                            "Applied configuration revision {} ({:?})",
                            self.store.revision(),
                            source
                        );
                    }
                    Err(err) => {
                        log::warn!("Rejected configuration: {err}");
                        if !self.store.is_ready() {
                            self.status = ConnectionStatus::Offline;
                        }
                    }
                }
            }
            SyncEvent::SyncFailed(err) => {
                log::warn!("Sync failed: {err}");
                self.status = ConnectionStatus::Offline;
            }
            SyncEvent::Reported => log::debug!("Session report acknowledged"),
            SyncEvent::ReportFailed(err) => {
                log::warn!("Session report failed: {err}");
                self.status = ConnectionStatus::Offline;
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// The backend holds a session this client may pick up
    pub fn can_resume(&self) -> bool {
        self.store.is_ready() && self.store.grant().resumable().is_some()
    }

    /// Begin a fresh run from zeroed counters
    pub fn start(&mut self) -> Result<()> {
        self.expect_phase_idle("start")?;
        if !self.store.is_ready() {
            return Err(GameError::NotReady);
        }
        self.begin_run(SessionState::new(self.revive_policy.initial_credits()))
    }

    /// Begin a run seeded from the backend's saved counters
    pub fn resume(&mut self) -> Result<()> {
        self.expect_phase_idle("resume")?;
        if !self.store.is_ready() {
            return Err(GameError::NotReady);
        }
        let saved = self
            .store
            .grant()
            .resumable()
            .cloned()
            .ok_or(GameError::NoResumableSession)?;

        // The saved count is the remaining pool
        let credits = match self.revive_policy {
            RevivePolicy::LocalPool { initial } => saved.revive_count.unwrap_or(initial),
            RevivePolicy::RemoteReasons => 0,
        };
        let mut session = SessionState::new(credits);
        session.score = saved.score.unwrap_or(0);
        session.coins = saved.coins.unwrap_or(0);
        session.coupons = saved.coupons.unwrap_or(0);
        log::info!(
            "Resuming session: score {}, {} coins, {} coupons",
            session.score,
            session.coins,
            session.coupons
        );
        self.begin_run(session)
    }

    fn expect_phase_idle(&self, action: &'static str) -> Result<()> {
        match self.state.session.phase {
            RunPhase::Idle => Ok(()),
            phase => Err(GameError::WrongPhase { action, phase }),
        }
    }

    fn begin_run(&mut self, mut session: SessionState) -> Result<()> {
        let params = *self.store.parameters().ok_or(GameError::NotReady)?;
        let state = &mut self.state;

        state.entities.clear();
        state.bird.reset(&state.arena);
        let first_x = (state.bird.pos.x + FIRST_PIPE_MIN_LEAD)
            .max(state.arena.width - params.horizontal_spacing);
        state
            .entities
            .spawn_obstacle_at(first_x, state.arena.height, &params, &mut state.rng);

        session.phase = RunPhase::Running;
        state.session = session;
        self.pending = TickInput::default();
        log::info!("Run started (first pipe at x={first_x:.0})");
        Ok(())
    }

    /// Advance one fixed step. Returns the cause if the run ended this tick.
    pub fn tick(&mut self) -> Option<EndCause> {
        self.apply_pending_sync();

        let input = TickInput {
            flap: self.pending.flap,
            autopilot: self.autopilot,
        };
        self.pending = TickInput::default();

        let Some(params) = self.store.parameters().copied() else {
            // Nothing can run without parameters; effects still fade
            self.state.entities.advance(0.0);
            return None;
        };

        let cause = tick(&mut self.state, &params, &input)?;
        log::info!(
            "Run ended: {:?} (score {}, {} coins, {} coupons)",
            cause,
            self.state.session.score,
            self.state.session.coins,
            self.state.session.coupons
        );
        self.report(cause);
        Some(cause)
    }

    fn report(&mut self, cause: EndCause) {
        if self.status != ConnectionStatus::Online {
            log::info!("Not online ({:?}), session report skipped", self.status);
            return;
        }
        let grant = self.store.grant();
        let session = &self.state.session;
        let report = OutcomeReport {
            verdict: cause.verdict(),
            score: session.score,
            coins: session.coins,
            coupons: session.coupons,
            revive_used: session.revive_used,
            game_instance_id: grant.game_instance_id.clone(),
            session_id: grant.session_id.clone(),
        };
        self.service.report_outcome(report, self.inbox.clone());
    }

    /// Queue a flap for the next tick (ignored unless running)
    pub fn jump(&mut self) {
        if self.state.session.phase.is_running() {
            self.pending.flap = true;
        }
    }

    /// Space, click or tap: jump while running, revive or restart once ended
    pub fn primary_action(&mut self) -> Result<()> {
        match self.state.session.phase {
            RunPhase::Running => {
                self.jump();
                Ok(())
            }
            RunPhase::Ended(_) if self.can_revive() => self.revive(),
            RunPhase::Ended(_) => self.restart(),
            RunPhase::Idle => Ok(()),
        }
    }

    /// A revive credit exists under the configured policy
    pub fn revive_available(&self) -> bool {
        match self.revive_policy {
            RevivePolicy::LocalPool { .. } => self.state.session.revive_credits > 0,
            RevivePolicy::RemoteReasons => !self.store.grant().revival.unlocked.is_empty(),
        }
    }

    /// The run has ended and a revive credit exists
    pub fn can_revive(&self) -> bool {
        matches!(self.state.session.phase, RunPhase::Ended(_)) && self.revive_available()
    }

    /// Continue an ended run: clear nearby pipes and put the bird back at center
    pub fn revive(&mut self) -> Result<()> {
        match self.state.session.phase {
            RunPhase::Ended(_) => {}
            phase => {
                return Err(GameError::WrongPhase {
                    action: "revive",
                    phase,
                });
            }
        }
        if !self.revive_available() {
            return Err(GameError::RevivalUnavailable);
        }

        let state = &mut self.state;
        if let RevivePolicy::LocalPool { .. } = self.revive_policy {
            state.session.revive_credits -= 1;
        }
        let cleared = state.entities.clear_revive_window(state.bird.pos.x);
        state.bird.reset(&state.arena);
        let center = state.bird.center();
        state
            .entities
            .burst(center, EffectColor::Pink, REVIVE_BURST, &mut state.rng);
        state.session.revive_used = true;
        state.session.phase = RunPhase::Running;
        self.pending = TickInput::default();

        log::info!(
            "Revived ({cleared} pipes cleared, {} credits left)",
            state.session.revive_credits
        );
        Ok(())
    }

    /// Drop the finished run and return to Idle
    pub fn restart(&mut self) -> Result<()> {
        match self.state.session.phase {
            RunPhase::Ended(_) => {}
            phase => {
                return Err(GameError::WrongPhase {
                    action: "restart",
                    phase,
                });
            }
        }
        let state = &mut self.state;
        state.entities.clear();
        state.bird.reset(&state.arena);
        state.session = SessionState::new(self.revive_policy.initial_credits());
        self.pending = TickInput::default();
        log::info!("Restarted");
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.session.phase
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn revive_policy(&self) -> RevivePolicy {
        self.revive_policy
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::api::{ApiClient, MemoryBackend, fallback::fallback_response};
    use crate::consts::*;
    use crate::sim::fixtures::medium_config;
    use crate::sim::{Pickup, PickupKind, Pipe, RemoteConfig, RevivalReasons, SavedSession, Verdict};
    use glam::Vec2;

    /// Records calls; completions are pushed by the test itself
    #[derive(Default, Clone)]
    struct RecordingService {
        syncs: Rc<RefCell<u32>>,
        reports: Rc<RefCell<Vec<OutcomeReport>>>,
    }

    impl SyncService for RecordingService {
        fn request_sync(&self, _inbox: SyncInbox) {
            *self.syncs.borrow_mut() += 1;
        }

        fn report_outcome(&self, report: OutcomeReport, _inbox: SyncInbox) {
            self.reports.borrow_mut().push(report);
        }
    }

    fn controller(policy: RevivePolicy) -> SessionController<RecordingService> {
        let settings = ClientSettings {
            revive_policy: policy,
            ..Default::default()
        };
        SessionController::new(RecordingService::default(), &settings, 7)
    }

    fn deliver(ctl: &mut SessionController<RecordingService>, config: RemoteConfig) {
        ctl.inbox().push(SyncEvent::Config {
            config,
            source: ConfigSource::Live,
        });
        ctl.apply_pending_sync();
    }

    fn ready_controller() -> SessionController<RecordingService> {
        let mut ctl = controller(RevivePolicy::default());
        deliver(&mut ctl, medium_config());
        ctl
    }

    /// Tick without input until the bird drops out of the arena
    fn run_until_end<S: SyncService>(ctl: &mut SessionController<S>) -> EndCause {
        for _ in 0..10_000 {
            if let Some(cause) = ctl.tick() {
                return cause;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_start_requires_config() {
        let mut ctl = controller(RevivePolicy::default());
        assert_eq!(ctl.status(), ConnectionStatus::Connecting);
        assert_eq!(ctl.start(), Err(GameError::NotReady));
        assert_eq!(ctl.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_incomplete_config_keeps_not_ready() {
        let mut ctl = controller(RevivePolicy::default());
        deliver(
            &mut ctl,
            RemoteConfig {
                bird_speed: None,
                ..medium_config()
            },
        );
        assert!(!ctl.is_ready());
        assert_eq!(ctl.status(), ConnectionStatus::Offline);
        assert_eq!(ctl.start(), Err(GameError::NotReady));
    }

    #[test]
    fn test_request_sync_uses_service() {
        let mut ctl = controller(RevivePolicy::default());
        ctl.request_sync();
        assert_eq!(*ctl.service().syncs.borrow(), 1);
        assert!(!ctl.is_ready());
    }

    #[test]
    fn test_start_places_first_pipe_ahead() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();

        let state = ctl.state();
        assert_eq!(state.session.phase, RunPhase::Running);
        assert_eq!(state.bird.pos.y, DEFAULT_ARENA_HEIGHT / 2.0);
        assert_eq!(state.entities.pipes.len(), 1);
        // max(50 + 200, 800 - 500)
        assert_eq!(state.entities.pipes[0].x, 300.0);
        assert_eq!(state.session.revive_credits, DEFAULT_REVIVE_POOL);
    }

    #[test]
    fn test_first_pipe_never_closer_than_lead() {
        let mut ctl = ready_controller();
        ctl.resize(400.0, 600.0);
        ctl.start().unwrap();
        assert_eq!(ctl.state().entities.pipes[0].x, BIRD_X + FIRST_PIPE_MIN_LEAD);
    }

    #[test]
    fn test_start_twice_is_wrong_phase() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        assert_eq!(
            ctl.start(),
            Err(GameError::WrongPhase {
                action: "start",
                phase: RunPhase::Running
            })
        );
    }

    #[test]
    fn test_resume_without_grant() {
        let mut ctl = ready_controller();
        assert!(!ctl.can_resume());
        assert_eq!(ctl.resume(), Err(GameError::NoResumableSession));
        assert_eq!(ctl.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_resume_seeds_counters() {
        let mut ctl = controller(RevivePolicy::default());
        deliver(
            &mut ctl,
            RemoteConfig {
                can_resume: true,
                active_session: Some(SavedSession {
                    score: Some(6),
                    coins: Some(11),
                    coupons: Some(2),
                    revive_count: Some(1),
                }),
                ..medium_config()
            },
        );
        assert!(ctl.can_resume());
        ctl.resume().unwrap();

        let session = &ctl.state().session;
        assert_eq!(session.phase, RunPhase::Running);
        assert_eq!(session.score, 6);
        assert_eq!(session.coins, 11);
        assert_eq!(session.coupons, 2);
        assert_eq!(session.revive_credits, 1);
    }

    #[test]
    fn test_resume_without_saved_count_gets_full_pool() {
        let mut ctl = controller(RevivePolicy::default());
        deliver(
            &mut ctl,
            RemoteConfig {
                can_resume: true,
                active_session: Some(SavedSession::default()),
                ..medium_config()
            },
        );
        ctl.resume().unwrap();
        assert_eq!(ctl.state().session.revive_credits, DEFAULT_REVIVE_POOL);
    }

    #[test]
    fn test_resume_past_target_still_wins() {
        let mut ctl = controller(RevivePolicy::default());
        deliver(
            &mut ctl,
            RemoteConfig {
                can_resume: true,
                active_session: Some(SavedSession {
                    coupons: Some(4),
                    ..Default::default()
                }),
                ..medium_config()
            },
        );
        ctl.resume().unwrap();
        place_coupon_at_bird(&mut ctl);
        assert_eq!(ctl.tick(), Some(EndCause::Won));
        assert_eq!(ctl.state().session.coupons, 5);
    }

    #[test]
    fn test_saved_session_needs_permission() {
        let mut ctl = controller(RevivePolicy::default());
        deliver(
            &mut ctl,
            RemoteConfig {
                can_resume: false,
                active_session: Some(SavedSession::default()),
                ..medium_config()
            },
        );
        assert_eq!(ctl.resume(), Err(GameError::NoResumableSession));
    }

    #[test]
    fn test_fall_reports_loss() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        assert_eq!(run_until_end(&mut ctl), EndCause::Fell);
        assert_eq!(ctl.phase(), RunPhase::Ended(EndCause::Fell));

        let reports = ctl.service().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].verdict, Verdict::Lost);
        assert_eq!(reports[0].game_instance_id.as_deref(), Some("instance-1"));
        assert!(!reports[0].revive_used);
    }

    #[test]
    fn test_fallback_status_skips_report() {
        let mut ctl = controller(RevivePolicy::default());
        ctl.inbox().push(SyncEvent::Config {
            config: medium_config(),
            source: ConfigSource::Fallback,
        });
        ctl.apply_pending_sync();
        assert_eq!(ctl.status(), ConnectionStatus::Fallback);

        ctl.start().unwrap();
        run_until_end(&mut ctl);
        assert!(ctl.service().reports.borrow().is_empty());
    }

    #[test]
    fn test_report_failure_goes_offline() {
        let mut ctl = ready_controller();
        ctl.inbox()
            .push(SyncEvent::ReportFailed(GameError::NetworkFailure("500".into())));
        ctl.tick();
        assert_eq!(ctl.status(), ConnectionStatus::Offline);
        // Parameters survive
        assert!(ctl.is_ready());
    }

    #[test]
    fn test_config_applies_between_ticks_only() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        ctl.tick();
        let gap_before = ctl.state().entities.pipes[0].gap;

        ctl.inbox().push(SyncEvent::Config {
            config: RemoteConfig {
                vertical_pipe_gap: Some(120.0),
                ..medium_config()
            },
            source: ConfigSource::Live,
        });
        // Queued, not yet applied
        assert_eq!(ctl.store().parameters().unwrap().vertical_gap, 250.0);

        ctl.tick();
        assert_eq!(ctl.store().parameters().unwrap().vertical_gap, 120.0);
        // In-flight pipes keep the gap they spawned with
        assert_eq!(ctl.state().entities.pipes[0].gap, gap_before);
    }

    #[test]
    fn test_jump_only_while_running() {
        let mut ctl = ready_controller();
        ctl.jump();
        ctl.primary_action().unwrap();
        assert_eq!(ctl.phase(), RunPhase::Idle);

        ctl.start().unwrap();
        let y = ctl.state().bird.pos.y;
        ctl.primary_action().unwrap();
        ctl.tick();
        assert!(ctl.state().bird.pos.y < y);
    }

    #[test]
    fn test_revive_local_pool() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        run_until_end(&mut ctl);

        // A pipe inside the window and one outside it
        let bird_x = ctl.state().bird.pos.x;
        ctl.state.entities.pipes = vec![
            Pipe {
                id: 90,
                x: bird_x + 20.0,
                gap_top: 100.0,
                gap: 250.0,
                passed: false,
            },
            Pipe {
                id: 91,
                x: bird_x + 300.0,
                gap_top: 100.0,
                gap: 250.0,
                passed: false,
            },
        ];

        assert!(ctl.can_revive());
        ctl.revive().unwrap();

        let state = ctl.state();
        assert_eq!(state.session.phase, RunPhase::Running);
        assert_eq!(state.session.revive_credits, DEFAULT_REVIVE_POOL - 1);
        assert!(state.session.revive_used);
        assert_eq!(state.bird.pos.y, DEFAULT_ARENA_HEIGHT / 2.0);
        assert_eq!(state.bird.velocity, 0.0);
        let ids: Vec<u32> = state.entities.pipes.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![91]);
    }

    #[test]
    fn test_revive_reported_after_second_end() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        run_until_end(&mut ctl);
        ctl.revive().unwrap();
        run_until_end(&mut ctl);

        let reports = ctl.service().reports.borrow();
        assert_eq!(reports.len(), 2);
        assert!(reports[1].revive_used);
    }

    #[test]
    fn test_empty_pool_cannot_revive() {
        let mut ctl = controller(RevivePolicy::LocalPool { initial: 0 });
        deliver(&mut ctl, medium_config());
        ctl.start().unwrap();
        run_until_end(&mut ctl);

        assert!(!ctl.can_revive());
        assert_eq!(ctl.revive(), Err(GameError::RevivalUnavailable));
        // Primary action falls through to restart
        ctl.primary_action().unwrap();
        assert_eq!(ctl.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_remote_reasons_policy() {
        let mut ctl = controller(RevivePolicy::RemoteReasons);
        deliver(&mut ctl, medium_config());
        ctl.start().unwrap();
        run_until_end(&mut ctl);
        assert_eq!(ctl.revive(), Err(GameError::RevivalUnavailable));

        deliver(
            &mut ctl,
            RemoteConfig {
                revival: RevivalReasons {
                    unlocked: vec!["WATCH_AD".into()],
                    locked: vec![],
                },
                ..medium_config()
            },
        );
        ctl.revive().unwrap();
        assert_eq!(ctl.phase(), RunPhase::Running);
        // No local decrement under this policy
        run_until_end(&mut ctl);
        assert!(ctl.can_revive());
    }

    fn place_coupon_at_bird<S: SyncService>(ctl: &mut SessionController<S>) {
        let bird = ctl.state.bird.pos;
        ctl.state.entities.coupons.push(Pickup::new(
            900,
            PickupKind::Coupon,
            Vec2::new(bird.x + 1.0, bird.y),
        ));
    }

    #[test]
    fn test_revive_requires_ended_run() {
        let mut ctl = ready_controller();
        assert!(matches!(
            ctl.revive(),
            Err(GameError::WrongPhase { action: "revive", .. })
        ));
        ctl.start().unwrap();
        assert!(!ctl.can_revive());
        assert!(matches!(
            ctl.revive(),
            Err(GameError::WrongPhase {
                phase: RunPhase::Running,
                ..
            })
        ));
    }

    #[test]
    fn test_revive_after_win_never_wins_twice() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        ctl.state.session.coupons = 3;
        place_coupon_at_bird(&mut ctl);
        assert_eq!(ctl.tick(), Some(EndCause::Won));
        assert_eq!(ctl.state().session.revive_credits, DEFAULT_REVIVE_POOL + 1);

        // Primary action revives a won run while a credit exists
        assert!(ctl.can_revive());
        ctl.primary_action().unwrap();
        assert_eq!(ctl.phase(), RunPhase::Running);
        assert_eq!(ctl.state().session.revive_credits, DEFAULT_REVIVE_POOL);

        place_coupon_at_bird(&mut ctl);
        assert_eq!(ctl.tick(), None);
        assert_eq!(ctl.state().session.coupons, 5);
        assert_eq!(ctl.phase(), RunPhase::Running);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut ctl = ready_controller();
        ctl.start().unwrap();
        run_until_end(&mut ctl);
        ctl.revive().unwrap();
        run_until_end(&mut ctl);

        ctl.restart().unwrap();
        let state = ctl.state();
        assert_eq!(state.session.phase, RunPhase::Idle);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.revive_credits, DEFAULT_REVIVE_POOL);
        assert!(!state.session.revive_used);
        assert!(state.entities.pipes.is_empty());
        assert!(state.entities.particles.is_empty());
    }

    #[test]
    fn test_restart_only_when_ended() {
        let mut ctl = ready_controller();
        assert!(matches!(
            ctl.restart(),
            Err(GameError::WrongPhase { action: "restart", .. })
        ));
    }

    #[test]
    fn test_failed_resync_keeps_live_config() {
        let mut response = fallback_response().unwrap();
        let game = &mut response.games[0];
        game.game_instance_id = Some("live".to_string());
        if let Some(values) = game.game_parameter_values.as_mut() {
            values.bird_speed = Some(30.0);
        }
        let backend = MemoryBackend::new(response);
        let client = ApiClient::new(backend.clone(), ClientSettings::default());
        let mut ctl = SessionController::new(client, &ClientSettings::default(), 5);

        ctl.request_sync();
        ctl.tick();
        assert_eq!(ctl.status(), ConnectionStatus::Online);

        backend.set_fail_sync(true);
        ctl.start().unwrap();
        run_until_end(&mut ctl);
        assert_eq!(backend.sessions().len(), 1);

        // Report acknowledged, then the resync fell back
        ctl.tick();
        assert_eq!(ctl.status(), ConnectionStatus::Offline);
        assert_eq!(ctl.store().parameters().unwrap().bird_speed, 30.0);
        assert_eq!(ctl.store().grant().game_instance_id.as_deref(), Some("live"));
        assert_eq!(ctl.store().revision(), 1);
    }

    #[test]
    fn test_fallback_applies_only_before_ready() {
        let mut ctl = ready_controller();
        ctl.inbox().push(SyncEvent::Config {
            config: RemoteConfig {
                game_instance_id: Some("builtin".to_string()),
                ..medium_config()
            },
            source: ConfigSource::Fallback,
        });
        ctl.apply_pending_sync();
        assert_eq!(ctl.status(), ConnectionStatus::Offline);
        assert_eq!(
            ctl.store().grant().game_instance_id.as_deref(),
            Some("instance-1")
        );
    }

    #[test]
    fn test_end_to_end_with_memory_backend() {
        let backend = MemoryBackend::new(fallback_response().unwrap());
        let client = ApiClient::new(backend.clone(), ClientSettings::default());
        let mut ctl = SessionController::new(client, &ClientSettings::default(), 3);

        ctl.request_sync();
        ctl.tick();
        assert_eq!(ctl.status(), ConnectionStatus::Online);
        assert!(ctl.is_ready());

        ctl.start().unwrap();
        let mut cause = None;
        for _ in 0..10_000 {
            cause = ctl.tick();
            if cause.is_some() {
                break;
            }
        }
        assert_eq!(cause, Some(EndCause::Fell));

        let sessions = backend.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].verdict, Verdict::Lost);
        assert_eq!(
            sessions[0].game_instance_id,
            "b3d66f06-6d47-4896-8bfc-2706686b3dd0"
        );

        // The follow-up sync is queued and applied on the next tick
        assert_eq!(ctl.inbox().len(), 2);
        ctl.tick();
        assert_eq!(ctl.store().revision(), 2);
        assert_eq!(backend.sync_calls(), 2);
    }
}

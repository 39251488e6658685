//! Per-agent tick scheduler.

use tracing::{debug, trace};

use crate::{
    Result,
    features::{Actions, Observations, Reward},
    ports::{AgentBrain, AgentId, Environment, EpisodeSummary, StepRecord},
};

/// What a single [`AgentDriver::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The environment reported the agent as inactive; nothing happened
    Inactive,
    /// The agent took a step. `skipped` is set when the brain was not asked
    /// for a new action and the previous one was repeated.
    Step { record: StepRecord, skipped: bool },
    /// The episode ended; the environment has been reset
    EpisodeEnded(EpisodeSummary),
}

/// Hosts one brain in an environment and advances it one tick at a time.
///
/// The first tick of an episode senses and calls `start`; later ticks sense
/// and call `act` with the reward of the previous step (a skipped tick hands
/// that reward to `record_reward` instead); once the environment
/// reports the episode over, the next tick calls `end`, resets the
/// environment and bumps the episode counter.
#[derive(Debug)]
pub struct AgentDriver<B> {
    id: AgentId,
    brain: B,
    episode: usize,
    step: usize,
    pending_skip: bool,
    action: Actions,
    reward: Reward,
}

impl<B: AgentBrain> AgentDriver<B> {
    /// Initialize `brain` with the spaces `env` reports for `id`.
    pub fn spawn<E>(id: AgentId, mut brain: B, env: &E) -> Result<Self>
    where
        E: Environment + ?Sized,
    {
        let info = env.agent_info(id);
        brain.initialize(&info)?;
        debug!(agent = %id, %info, "spawned agent");
        Ok(Self::resume(id, brain, env))
    }

    /// Host a brain that is already initialized for `env`, such as one
    /// restored from a snapshot. The next tick starts a fresh episode.
    pub fn resume<E>(id: AgentId, brain: B, env: &E) -> Self
    where
        E: Environment + ?Sized,
    {
        let info = env.agent_info(id);
        Self {
            id,
            brain,
            episode: 0,
            step: 0,
            pending_skip: false,
            action: info.actions.instance(),
            reward: info.reward.instance(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn brain(&self) -> &B {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut B {
        &mut self.brain
    }

    /// Episodes completed under this driver.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Steps taken in the current episode.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Keep the current action on the next acting tick instead of asking
    /// the brain for a new one. The request is consumed by that tick.
    pub fn request_skip(&mut self) {
        self.pending_skip = true;
    }

    pub fn skip_pending(&self) -> bool {
        self.pending_skip
    }

    fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.pending_skip)
    }

    /// Advance the agent by one tick.
    pub fn tick<E>(&mut self, env: &mut E) -> Result<TickOutcome>
    where
        E: Environment + ?Sized,
    {
        if !env.is_active(self.id) {
            return Ok(TickOutcome::Inactive);
        }

        if self.step == 0 {
            let sensors = env.sense(self.id)?;
            self.action = self.brain.start(&sensors)?;
            return self.take_step(env, sensors, false);
        }

        if env.is_episode_over(self.id) {
            self.brain.end(&self.reward)?;
            env.reset(self.id)?;
            let summary = EpisodeSummary {
                episode: self.episode,
                steps: self.step,
                fitness: self.brain.fitness().clone(),
            };
            debug!(
                agent = %self.id,
                episode = self.episode,
                steps = self.step,
                fitness = %summary.fitness,
                "episode over"
            );
            self.episode += 1;
            self.step = 0;
            return Ok(TickOutcome::EpisodeEnded(summary));
        }

        let sensors = env.sense(self.id)?;
        let skipped = self.take_skip();
        if skipped {
            self.brain.record_reward(&self.reward)?;
        } else {
            self.action = self.brain.act(&sensors, &self.reward)?;
        }
        self.take_step(env, sensors, skipped)
    }

    fn take_step<E>(
        &mut self,
        env: &mut E,
        sensors: Observations,
        skipped: bool,
    ) -> Result<TickOutcome>
    where
        E: Environment + ?Sized,
    {
        self.reward = env.step(self.id, &self.action)?;
        let record = StepRecord {
            step: self.step,
            sensors,
            action: self.action.clone(),
            reward: self.reward.clone(),
        };
        trace!(
            agent = %self.id,
            step = self.step,
            action = %record.action,
            reward = %record.reward,
            "step"
        );
        self.step += 1;
        Ok(TickOutcome::Step { record, skipped })
    }

    /// Destroy the brain and hand it back.
    pub fn destroy(mut self) -> Result<B> {
        self.brain.destroy()?;
        Ok(self.brain)
    }
}

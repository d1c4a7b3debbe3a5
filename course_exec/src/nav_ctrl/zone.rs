//! # Zone states

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use eqpt_if::zone::ZoneAction;
use log::{info, warn};

use super::{NavCtrl, NavCtrlError, NavState, Platform, Transition};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Number of zone markers met so far in the run. Only ever counts up.
///
/// The first zone is the pickup, every later one a dropoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneCounter(u32);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ZoneCounter {
    /// Count a new zone marker, returning the new count.
    pub fn increment(&mut self) -> u32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Action for the most recently counted zone.
    pub fn action(&self) -> ZoneAction {
        match self.0 {
            1 => ZoneAction::Pickup,
            _ => ZoneAction::Dropoff,
        }
    }

    /// State to enter for the most recently counted zone.
    pub fn zone_state(&self) -> NavState {
        match self.action() {
            ZoneAction::Pickup => NavState::PickupZone,
            ZoneAction::Dropoff => NavState::DropoffZone,
        }
    }
}

impl<P: Platform> NavCtrl<P> {
    /// Hand over to the zone handler and wait for it, then go back to following the line.
    ///
    /// No sensors are checked while in a zone, and a failed action does not stop the run.
    pub(super) fn step_zone(&mut self, action: ZoneAction) -> Result<Transition, NavCtrlError> {
        info!("In {} zone #{}", action, self.zone_counter.get());

        if let Err(e) = self.zone_handler.handle(action, &mut self.platform) {
            warn!("{}", e);
        }

        info!("Resuming line follow after {} zone", action);

        Ok(Transition::To(NavState::FollowLine))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nav_ctrl::test_util::sim_ctrl;
    use eqpt_if::{
        clock::Clock,
        color::ColorLabel,
        zone::{ZoneError, ZoneHandler},
    };
    use std::{cell::RefCell, rc::Rc};

    /// Handler recording the actions it was asked for, failing every dropoff.
    struct Recording(Rc<RefCell<Vec<ZoneAction>>>);

    impl ZoneHandler for Recording {
        fn handle(&mut self, action: ZoneAction, clock: &mut dyn Clock) -> Result<(), ZoneError> {
            clock.delay_ms(50);
            self.0.borrow_mut().push(action);
            match action {
                ZoneAction::Pickup => Ok(()),
                ZoneAction::Dropoff => Err(ZoneError::ActionFailed(action, "jammed".into())),
            }
        }
    }

    #[test]
    fn test_zone_counter() {
        let mut c = ZoneCounter::default();
        assert_eq!(c.get(), 0);

        assert_eq!(c.increment(), 1);
        assert_eq!(c.action(), ZoneAction::Pickup);
        assert_eq!(c.zone_state(), NavState::PickupZone);

        assert_eq!(c.increment(), 2);
        assert_eq!(c.zone_state(), NavState::DropoffZone);
        assert_eq!(c.increment(), 3);
        assert_eq!(c.zone_state(), NavState::DropoffZone);
    }

    #[test]
    fn test_default_hold() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_color(ColorLabel::Blue);
        ctrl.step();

        let before_ms = ctrl.platform().now_ms();
        ctrl.step();

        assert_eq!(ctrl.state(), NavState::FollowLine);
        assert_eq!(ctrl.platform().now_ms() - before_ms, 300);
    }

    #[test]
    fn test_zone_step_counts_once() {
        let mut ctrl = sim_ctrl();
        ctrl.platform_mut().set_color(ColorLabel::Blue);
        ctrl.step();
        assert_eq!(ctrl.zone_count(), 1);

        // Still over the marker, but the zone state does not look at it
        ctrl.platform_mut().clear_drive_log();
        let reads = ctrl.platform().color_reads();
        ctrl.step();
        assert_eq!(ctrl.zone_count(), 1);
        assert_eq!(ctrl.platform().color_reads(), reads);
        assert!(ctrl.platform().drive_cmds().is_empty());
    }

    #[test]
    fn test_handler_failure_resumes() {
        let actions = Rc::new(RefCell::new(Vec::new()));
        let mut ctrl = sim_ctrl().with_zone_handler(Box::new(Recording(actions.clone())));
        ctrl.platform_mut().set_color(ColorLabel::Blue);

        // Pickup then dropoff, both return to line following
        for _ in 0..4 {
            ctrl.step();
        }

        assert_eq!(ctrl.state(), NavState::FollowLine);
        assert_eq!(*actions.borrow(), vec![ZoneAction::Pickup, ZoneAction::Dropoff]);
        assert_eq!(ctrl.zone_count(), 2);
    }
}

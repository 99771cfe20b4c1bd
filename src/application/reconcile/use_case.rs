//! Reconcile Use Case
//!
//! Orchestrates one reconciliation run:
//! 1. List every configured domain into one merged listing
//! 2. Check eligibility of listed users (sync-all only)
//! 3. Read the local accounts
//! 4. Plan the diff (pure, in `domain::services`)
//! 5. Disable, then enable, then add - one account at a time
//! 6. Record domains, resync groups of every active account and
//!    optionally refresh their attributes
//!
//! Per-account failures are counted and the run continues. Anything that
//! makes the whole picture untrustworthy (no domains, store unreadable,
//! domain listing failure under abort policy, cancellation) aborts the
//! run with a fatal result. `sync` never returns an error.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::domain::entities::{DirectoryListing, DomainConfig, Identity};
use crate::domain::policies::{ExclusionPolicy, ExclusionReason, ExclusionRules};
use crate::domain::ports::{
    DirectoryLister, EligibilityChecker, Enrichment, EnrichmentError, GroupMembership,
    NoopEnrichment, NoopEventSink, NoopPagePublisher, SyncEvent, SyncEventSink, UserPagePublisher,
    UserStore,
};
use crate::domain::services::{Eligibility, PlanMode, PlannedAccount, Planner};
use crate::domain::value_objects::{ActionKind, DomainName, Username};
use crate::error::{LdapSyncError, LdapSyncResult};

use super::context::RunContext;
use super::options::ReconcileOptions;
use super::result::SyncResult;

/// Reconcile use case - drives the directory/local diff to completion
///
/// Parameterized by its ports so tests can substitute in-memory doubles.
/// The directory ports are shared with worker threads so a hung call can
/// be abandoned. The optional collaborators (enrichment, user pages,
/// events) default to no-ops.
pub struct ReconcileUseCase<'a, L, E, S, G>
where
    L: DirectoryLister + Send + Sync + 'static,
    E: EligibilityChecker + Send + Sync + 'static,
    S: UserStore,
    G: GroupMembership,
{
    directory: Arc<L>,
    eligibility: Arc<E>,
    store: S,
    groups: G,
    enrichment: Box<dyn Enrichment + 'a>,
    pages: Box<dyn UserPagePublisher + 'a>,
    events: Arc<dyn SyncEventSink>,
}

impl<'a, L, E, S, G> ReconcileUseCase<'a, L, E, S, G>
where
    L: DirectoryLister + Send + Sync + 'static,
    E: EligibilityChecker + Send + Sync + 'static,
    S: UserStore,
    G: GroupMembership,
{
    pub fn new(directory: Arc<L>, eligibility: Arc<E>, store: S, groups: G) -> Self {
        Self {
            directory,
            eligibility,
            store,
            groups,
            enrichment: Box::new(NoopEnrichment),
            pages: Box::new(NoopPagePublisher),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_enrichment(mut self, enrichment: Box<dyn Enrichment + 'a>) -> Self {
        self.enrichment = enrichment;
        self
    }

    pub fn with_page_publisher(mut self, pages: Box<dyn UserPagePublisher + 'a>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn SyncEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Run one reconciliation
    pub fn sync(
        &self,
        domains: &[DomainConfig],
        rules: &ExclusionRules,
        options: &ReconcileOptions,
        ctx: &RunContext,
    ) -> SyncResult {
        let mut result = SyncResult::new();
        result.set_dry_run(options.dry_run);

        self.events.on_event(SyncEvent::Started {
            domains: domains.iter().map(|d| d.name.clone()).collect(),
            mechanism: options.mechanism.as_str().to_string(),
            dry_run: options.dry_run,
        });
        info!(
            mechanism = options.mechanism.as_str(),
            domains = domains.len(),
            dry_run = options.dry_run,
            "reconciliation started"
        );

        if let Err(err) = self.run(domains, rules, options, ctx, &mut result) {
            error!(error = %err, "reconciliation aborted");
            result.mark_fatal(err.to_string());
        }

        let result = result.finish();
        info!(
            ok = result.ok(),
            added = result.added_count(),
            added_failed = result.added_fail_count(),
            enabled = result.enabled_count(),
            disabled = result.disabled_count(),
            disabled_failed = result.disabled_fail_count(),
            "reconciliation finished"
        );
        self.events.on_event(SyncEvent::Completed {
            ok: result.ok(),
            added: result.added_count(),
            added_failed: result.added_fail_count(),
            enabled: result.enabled_count(),
            disabled: result.disabled_count(),
            disabled_failed: result.disabled_fail_count(),
        });
        result
    }

    fn run(
        &self,
        domains: &[DomainConfig],
        rules: &ExclusionRules,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        // An empty domain set would mark every local account for disabling
        if domains.is_empty() {
            return Err(LdapSyncError::NoDomains);
        }

        let mode = options.mechanism.plan_mode();
        let listing = self.list_domains(domains, options, ctx, result)?;
        let eligibility = match mode {
            PlanMode::SyncAll => self.check_eligibility(domains, &listing, options, ctx, result)?,
            PlanMode::DisableOnly => BTreeMap::new(),
        };

        ctx.checkpoint()?;
        let local = self.store.read_users()?;
        debug!(count = local.len(), "local accounts read");

        let plan = Planner::plan(mode, &listing, &eligibility, &local);
        for (username, reason) in &plan.protected {
            debug!(username = %username, reason = ?reason, "account left untouched");
        }
        info!(
            disable = plan.disable.len(),
            enable = plan.enable.len(),
            add = plan.add.len(),
            keep = plan.keep.len(),
            "plan computed"
        );

        let policy = ExclusionPolicy::new(rules);
        for candidate in &plan.disable {
            self.disable_one(candidate, &policy, options, ctx, result)?;
        }
        for account in &plan.enable {
            let domain = lookup_domain(domains, &account.domain)?;
            self.enable_one(account, domain, options, ctx, result)?;
        }
        for account in &plan.add {
            let domain = lookup_domain(domains, &account.domain)?;
            self.add_one(account, domain, options, ctx, result)?;
        }

        if options.dry_run || mode == PlanMode::DisableOnly {
            return Ok(());
        }

        for account in &plan.keep {
            if account.identity.domain.as_ref() != Some(&account.domain) {
                ctx.checkpoint()?;
                self.record_domain(&account.identity, &account.domain);
            }
        }

        // Kept accounts always get their groups resynced, attributes only
        // on request.
        for account in &plan.keep {
            ctx.checkpoint()?;
            let domain = lookup_domain(domains, &account.domain)?;
            let enriched = if options.enrich_all_active {
                self.enrich(&account.identity, domain)
            } else {
                self.enrichment.sync_groups(&account.identity, domain)
            };
            if let Err(err) = enriched {
                warn!(username = %account.identity.username, error = %err, "enrichment failed");
            }
        }

        Ok(())
    }

    fn list_domains(
        &self,
        domains: &[DomainConfig],
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<DirectoryListing> {
        let mut listing = DirectoryListing::new();

        for domain in domains {
            ctx.checkpoint()?;
            let directory = Arc::clone(&self.directory);
            let config = domain.clone();
            let listed = ctx.timed_call(options.call_timeout, move || {
                directory.list_usernames(&config)
            });
            if listed.is_err() {
                ctx.checkpoint()?;
            }

            match listed {
                Ok(usernames) => {
                    let count = listing.add_domain(&domain.name, usernames);
                    info!(domain = %domain.name, count, "domain listed");
                    self.events.on_event(SyncEvent::DomainListed {
                        domain: domain.name.clone(),
                        count,
                    });
                }
                Err(err) if options.abort_on_domain_error => {
                    self.events.on_event(SyncEvent::DomainFailed {
                        domain: domain.name.clone(),
                        error: err.to_string(),
                    });
                    return Err(LdapSyncError::Directory {
                        domain: domain.name.to_string(),
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(domain = %domain.name, error = %err, "domain skipped");
                    listing.mark_failed(&domain.name);
                    result.record_failed_domain(&domain.name);
                    self.events.on_event(SyncEvent::DomainFailed {
                        domain: domain.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(listing)
    }

    fn check_eligibility(
        &self,
        domains: &[DomainConfig],
        listing: &DirectoryListing,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<BTreeMap<Username, Eligibility>> {
        let mut eligibility = BTreeMap::new();

        for (username, domain_name) in listing.entries() {
            ctx.checkpoint()?;
            let domain = lookup_domain(domains, domain_name)?;
            let checker = Arc::clone(&self.eligibility);
            let (user, config) = (username.clone(), domain.clone());
            let checked = ctx.timed_call(options.call_timeout, move || {
                checker.is_eligible(&user, &config)
            });
            if checked.is_err() {
                ctx.checkpoint()?;
            }

            let verdict = match checked {
                Ok(true) => Eligibility::Eligible,
                Ok(false) => {
                    debug!(username = %username, domain = %domain_name, "not eligible");
                    Eligibility::Ineligible
                }
                Err(err) => {
                    warn!(username = %username, domain = %domain_name, error = %err, "eligibility check failed");
                    result.record_account_error(username, format!("eligibility check failed: {}", err));
                    Eligibility::Unknown
                }
            };
            eligibility.insert(username.clone(), verdict);
        }

        Ok(eligibility)
    }

    fn disable_one(
        &self,
        candidate: &Identity,
        policy: &ExclusionPolicy,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        ctx.checkpoint()?;
        let username = &candidate.username;

        let mut fresh = match self.store.find_user(username) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => {
                debug!(username = %username, "account vanished before disable");
                return Ok(());
            }
            Err(err) => {
                warn!(username = %username, error = %err, "disable failed");
                result.record_disable_failure(username, err.to_string());
                self.emit_failure(username, ActionKind::Disable, err.to_string());
                return Ok(());
            }
        };
        if fresh.domain.is_none() {
            fresh.domain = candidate.domain.clone();
        }

        match policy.is_excluded(&fresh, &self.groups) {
            Ok(None) => {}
            Ok(Some(ExclusionReason::AlreadyDisabled)) => {
                debug!(username = %username, "already disabled");
                return Ok(());
            }
            Ok(Some(reason)) => {
                info!(username = %username, reason = %reason, "disable skipped");
                result.record_excluded();
                self.emit_detail(SyncEvent::UserExcluded {
                    username: username.clone(),
                    reason: reason.to_string(),
                });
                return Ok(());
            }
            Err(err) => {
                warn!(username = %username, error = %err, "group lookup failed, not disabling");
                result.record_account_error(username, format!("group lookup failed: {}", err));
                return Ok(());
            }
        }

        if options.dry_run {
            info!(username = %username, "would disable");
            result.record_planned(username, ActionKind::Disable, fresh.domain.as_ref());
            self.emit_detail(SyncEvent::ActionPlanned {
                username: username.clone(),
                action: ActionKind::Disable,
            });
            return Ok(());
        }

        ctx.checkpoint()?;
        let started = Instant::now();
        let outcome = self.store.disable_user(&fresh, &options.block);
        warn_if_slow(options.call_timeout, started, username, "disable");

        match outcome {
            Ok(()) => {
                info!(username = %username, "account disabled");
                result.record_disabled(username);
                self.emit_detail(SyncEvent::UserDisabled {
                    username: username.clone(),
                });
            }
            Err(err) => {
                warn!(username = %username, error = %err, "disable failed");
                result.record_disable_failure(username, err.to_string());
                self.emit_failure(username, ActionKind::Disable, err.to_string());
            }
        }
        Ok(())
    }

    fn enable_one(
        &self,
        account: &PlannedAccount,
        domain: &DomainConfig,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        ctx.checkpoint()?;
        let username = &account.identity.username;

        match self.store.find_user(username) {
            Ok(Some(fresh)) if fresh.disabled => self.enable_existing(fresh, domain, options, ctx, result),
            Ok(Some(_)) => {
                debug!(username = %username, "already active");
                Ok(())
            }
            Ok(None) => {
                warn!(username = %username, "account vanished before enable");
                Ok(())
            }
            Err(err) => {
                self.fail_activation(username, ActionKind::Enable, err.to_string(), result);
                Ok(())
            }
        }
    }

    fn enable_existing(
        &self,
        fresh: Identity,
        domain: &DomainConfig,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        let username = fresh.username.clone();

        if options.dry_run {
            info!(username = %username, domain = %domain.name, "would enable");
            result.record_planned(&username, ActionKind::Enable, Some(&domain.name));
            self.emit_detail(SyncEvent::ActionPlanned {
                username,
                action: ActionKind::Enable,
            });
            return Ok(());
        }

        ctx.checkpoint()?;
        let started = Instant::now();
        let outcome = self.store.enable_user(&fresh, &options.block.actor);
        warn_if_slow(options.call_timeout, started, &username, "enable");

        if let Err(err) = outcome {
            self.fail_activation(&username, ActionKind::Enable, err.to_string(), result);
            return Ok(());
        }

        let active = fresh.with_disabled(false).with_domain(domain.name.clone());
        self.complete_activation(&active, domain, ActionKind::Enable, ctx, result)
    }

    fn add_one(
        &self,
        account: &PlannedAccount,
        domain: &DomainConfig,
        options: &ReconcileOptions,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        ctx.checkpoint()?;
        let username = &account.identity.username;

        match self.store.find_user(username) {
            Ok(None) => {}
            Ok(Some(existing)) if existing.disabled => {
                debug!(username = %username, "created meanwhile as disabled, enabling instead");
                return self.enable_existing(existing, domain, options, ctx, result);
            }
            Ok(Some(_)) => {
                debug!(username = %username, "created meanwhile");
                return Ok(());
            }
            Err(err) => {
                self.fail_activation(username, ActionKind::Add, err.to_string(), result);
                return Ok(());
            }
        }

        if options.dry_run {
            info!(username = %username, domain = %domain.name, "would add");
            result.record_planned(username, ActionKind::Add, Some(&domain.name));
            self.emit_detail(SyncEvent::ActionPlanned {
                username: username.clone(),
                action: ActionKind::Add,
            });
            return Ok(());
        }

        ctx.checkpoint()?;
        let directory = Arc::clone(&self.directory);
        let (user, config) = (username.clone(), domain.clone());
        let attributes = match ctx.timed_call(options.call_timeout, move || {
            directory.user_attributes(&user, &config)
        }) {
            Ok(attributes) => attributes,
            Err(err) => {
                ctx.checkpoint()?;
                self.fail_activation(username, ActionKind::Add, err.to_string(), result);
                return Ok(());
            }
        };

        ctx.checkpoint()?;
        let started = Instant::now();
        let outcome = self.store.create_user(username, &attributes);
        warn_if_slow(options.call_timeout, started, username, "create");

        let created = match outcome {
            Ok(created) => created.with_domain(domain.name.clone()),
            Err(err) => {
                self.fail_activation(username, ActionKind::Add, err.to_string(), result);
                return Ok(());
            }
        };

        if let Some(content) = &options.user_page_content {
            self.publish_page(username, content);
        }

        self.complete_activation(&created, domain, ActionKind::Add, ctx, result)
    }

    /// Record the domain, enrich, then count the activation
    fn complete_activation(
        &self,
        identity: &Identity,
        domain: &DomainConfig,
        action: ActionKind,
        ctx: &RunContext,
        result: &mut SyncResult,
    ) -> LdapSyncResult<()> {
        let username = &identity.username;
        self.record_domain(identity, &domain.name);

        ctx.checkpoint()?;
        // Directory attributes are copied on creation only; a re-enabled
        // account keeps its profile and just gets its groups back.
        let enriched = match action {
            ActionKind::Enable => self.enrichment.sync_groups(identity, domain),
            _ => self.enrich(identity, domain),
        };
        if let Err(err) = enriched {
            self.fail_activation(username, action, err.to_string(), result);
            return Ok(());
        }

        if action == ActionKind::Add {
            info!(username = %username, domain = %domain.name, "account added");
            result.record_added(username, &domain.name);
            self.emit_detail(SyncEvent::UserAdded {
                username: username.clone(),
                domain: domain.name.clone(),
            });
        } else {
            info!(username = %username, domain = %domain.name, "account enabled");
            result.record_enabled(username, &domain.name);
            self.emit_detail(SyncEvent::UserEnabled {
                username: username.clone(),
                domain: domain.name.clone(),
            });
        }
        Ok(())
    }

    fn fail_activation(
        &self,
        username: &Username,
        action: ActionKind,
        message: String,
        result: &mut SyncResult,
    ) {
        warn!(username = %username, action = %action, error = %message, "activation failed");
        self.emit_failure(username, action, message.clone());
        result.record_add_failure(username, action, message);
    }

    fn enrich(&self, identity: &Identity, domain: &DomainConfig) -> Result<(), EnrichmentError> {
        self.enrichment.sync_attributes(identity, domain)?;
        self.enrichment.sync_groups(identity, domain)
    }

    fn record_domain(&self, identity: &Identity, domain: &DomainName) {
        if let Err(err) = self.store.record_domain(identity, domain) {
            warn!(username = %identity.username, domain = %domain, error = %err, "could not record domain");
        }
    }

    fn publish_page(&self, username: &Username, content: &str) {
        if self.pages.page_exists(username) {
            return;
        }
        match self.pages.publish(username, content) {
            Ok(()) => debug!(username = %username, "user page created"),
            Err(err) => warn!(username = %username, error = %err, "user page not created"),
        }
    }

    fn emit_detail(&self, event: SyncEvent) {
        if self.events.wants_detailed_events() {
            self.events.on_event(event);
        }
    }

    fn emit_failure(&self, username: &Username, action: ActionKind, error: String) {
        self.emit_detail(SyncEvent::ActionFailed {
            username: username.clone(),
            action,
            error,
        });
    }
}

fn lookup_domain<'d>(domains: &'d [DomainConfig], name: &DomainName) -> LdapSyncResult<&'d DomainConfig> {
    domains
        .iter()
        .find(|d| &d.name == name)
        .ok_or_else(|| LdapSyncError::UnknownDomain(name.to_string()))
}

/// Store mutations cannot be abandoned midway; a slow one is only reported
fn warn_if_slow(limit: Option<Duration>, started: Instant, username: &Username, what: &str) {
    if let Some(limit) = limit {
        let elapsed = started.elapsed();
        if elapsed > limit {
            warn!(
                username = %username,
                elapsed_ms = elapsed.as_millis() as u64,
                limit_ms = limit.as_millis() as u64,
                "{} exceeded call timeout",
                what
            );
        }
    }
}

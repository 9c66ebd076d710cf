//! The six-phase convergence loop: selection, change creation, fee
//! calculation, balance, and the fallback/complete terminals.
//!
//! Phases are functions over a shared [`BuildContext`] plus whatever local
//! bookkeeping a phase needs; the driver in [`build`] applies them in
//! sequence until `Complete` or a fatal error escapes.

use std::collections::HashSet;

use crate::{
    assets::{Assets, Unit},
    coinselect::{dedupe, AvailableUtxo, CoinSelector, InsufficientFunds},
    fee::{calculate_fee, LinearFeeParams},
    minutxo::min_utxo_lovelace,
    transaction::{Address, Bytes32, Input, Output, StagingTransaction},
    unfrack::{self, ChangeOutput, UnfrackOptions},
    TxBuilderError,
};

/// Bounds the number of shortfall-triggered reselection rounds (§4.5).
const MAX_ATTEMPTS: u32 = 3;

/// Backstop against a phase-transition bug looping forever; the
/// termination argument in §4.5.6 bounds real runs far below this.
const MAX_PHASE_TRANSITIONS: u32 = 64;

/// What Balance should do with lovelace it can't place in a change output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnInsufficientChange {
    Error,
    Burn,
}

/// Caller-supplied knobs for a single [`build`] call.
pub struct BuildOptions {
    pub change_address: Address,
    pub coin_selection: Box<dyn CoinSelector>,
    pub unfrack: Option<UnfrackOptions>,
    pub drain_to: Option<usize>,
    pub on_insufficient_change: OnInsufficientChange,
    pub coins_per_utxo_byte: u64,
    pub fee_params: LinearFeeParams,
    /// Number of vkey witnesses the fee calculator's fake witness set
    /// should carry (see [`crate::fee::calculate_fee`]).
    pub signer_count: usize,
}

/// The state machine's scratchpad, threaded through every phase.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildContext {
    pub attempt: u32,
    pub shortfall: i128,
    pub calculated_fee: u64,
    pub change_outputs: Vec<ChangeOutput>,
    pub can_unfrack: bool,
}

impl BuildContext {
    fn new(can_unfrack: bool) -> Self {
        Self {
            attempt: 0,
            shortfall: 0,
            calculated_fee: 0,
            change_outputs: Vec::new(),
            can_unfrack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Selection,
    ChangeCreation,
    FeeCalculation,
    Balance,
    Fallback,
    Complete,
}

/// Runs the phase loop over `staging`'s explicit outputs against
/// `available_utxos`, selecting inputs and shaping change until the
/// transaction balances exactly. Returns a [`StagingTransaction`] with its
/// `inputs`, `outputs` (explicit outputs plus change) and `fee` populated,
/// ready for [`crate::BuildBabbage`] or signing.
///
/// Any inputs already set on `staging` (e.g. via `collect_from`) are
/// treated as committed: they must each appear in `available_utxos` (so
/// their assets are known to the balance equations) and are pulled out of
/// the pool before coin selection runs, rather than being left to chance.
pub fn build(
    staging: StagingTransaction,
    available_utxos: &[AvailableUtxo],
    options: &BuildOptions,
) -> Result<StagingTransaction, TxBuilderError> {
    let mut explicit_outputs = staging.outputs.clone().unwrap_or_default();
    let total_output_assets = explicit_outputs
        .iter()
        .fold(Assets::new(), |acc, o| acc.add(&output_assets(o)));

    let mut pool = dedupe(available_utxos.to_vec());
    let mut selected: Vec<AvailableUtxo> = Vec::new();
    let mut total_input_assets = Assets::new();

    for forced in staging.inputs.clone().unwrap_or_default() {
        let position = pool
            .iter()
            .position(|u| u.tx_hash == forced.tx_hash && u.output_index == forced.txo_index);

        let Some(position) = position else {
            return Err(TxBuilderError::InternalInvariantViolated(format!(
                "collected input {}#{} is not present in available_utxos",
                hex::encode(forced.tx_hash.0),
                forced.txo_index
            )));
        };

        let utxo = pool.remove(position);
        total_input_assets = total_input_assets.add(&utxo.assets);
        selected.push(utxo);
    }

    let mut ctx = BuildContext::new(options.unfrack.is_some());
    let mut phase = Phase::Selection;
    let mut transitions = 0u32;

    loop {
        if phase == Phase::Complete {
            break;
        }

        transitions += 1;
        if transitions > MAX_PHASE_TRANSITIONS {
            return Err(TxBuilderError::InternalInvariantViolated(
                "phase loop did not terminate".into(),
            ));
        }

        phase = match phase {
            Phase::Selection => run_selection(
                &mut ctx,
                &mut selected,
                &mut pool,
                &mut total_input_assets,
                &total_output_assets,
                options,
            )?,
            Phase::ChangeCreation => {
                run_change_creation(&mut ctx, &pool, &total_input_assets, &total_output_assets, options)?
            }
            Phase::FeeCalculation => run_fee_calculation(
                &mut ctx,
                &staging,
                &selected,
                &explicit_outputs,
                options,
            )?,
            Phase::Balance => run_balance(
                &mut ctx,
                &total_input_assets,
                &total_output_assets,
                &mut explicit_outputs,
                options,
            )?,
            Phase::Fallback => run_fallback(&mut ctx, options)?,
            Phase::Complete => unreachable!("handled above"),
        };
    }

    Ok(finalize(staging, &selected, explicit_outputs, &ctx))
}

fn run_selection(
    ctx: &mut BuildContext,
    selected: &mut Vec<AvailableUtxo>,
    pool: &mut Vec<AvailableUtxo>,
    total_input_assets: &mut Assets,
    total_output_assets: &Assets,
    options: &BuildOptions,
) -> Result<Phase, TxBuilderError> {
    let required = required_plus_shortfall(total_output_assets, ctx.shortfall);
    let delta = positive_delta(&required, total_input_assets);

    if delta.is_empty() && ctx.shortfall == 0 {
        return Ok(Phase::ChangeCreation);
    }

    // A selector that can't cover `delta` from the whole remaining pool
    // means the build is genuinely out of funds; that's a terminal,
    // user-correctable error rather than something downstream can repair.
    let newly_selected = options.coin_selection.select(pool.as_slice(), &delta)?;

    let picked: HashSet<(Bytes32, u64)> = newly_selected
        .iter()
        .map(|u| (u.tx_hash, u.output_index))
        .collect();
    pool.retain(|u| !picked.contains(&(u.tx_hash, u.output_index)));

    for utxo in &newly_selected {
        *total_input_assets = total_input_assets.add(&utxo.assets);
    }
    selected.extend(newly_selected);

    ctx.attempt += 1;
    ctx.shortfall = 0;

    tracing::debug!(attempt = ctx.attempt, selected = selected.len(), "selection round complete");

    Ok(Phase::ChangeCreation)
}

fn run_change_creation(
    ctx: &mut BuildContext,
    pool: &[AvailableUtxo],
    total_input_assets: &Assets,
    total_output_assets: &Assets,
    options: &BuildOptions,
) -> Result<Phase, TxBuilderError> {
    let native_leftover = native_leftover(total_input_assets, total_output_assets)?;

    let lovelace_leftover = total_input_assets.lovelace() as i128
        - total_output_assets.lovelace() as i128
        - ctx.calculated_fee as i128;

    if lovelace_leftover < 0 {
        ctx.shortfall = -lovelace_leftover;
        ctx.change_outputs.clear();
        return Ok(Phase::Selection);
    }

    let tentative = native_leftover.add(&Assets::from_lovelace(lovelace_leftover as u64));
    let min = min_utxo_lovelace(&options.change_address, &tentative, options.coins_per_utxo_byte)?;

    if (lovelace_leftover as u64) < min {
        let budget_exhausted = ctx.attempt >= MAX_ATTEMPTS || pool.is_empty();

        if !budget_exhausted {
            ctx.shortfall = min as i128 - lovelace_leftover;
            ctx.change_outputs.clear();
            return Ok(Phase::Selection);
        }

        if !native_leftover.is_empty() {
            let unit = native_leftover
                .get_units()
                .next()
                .cloned()
                .unwrap_or(Unit::Lovelace);
            return Err(insufficient_funds_for_assets(
                unit.clone(),
                native_leftover.get_asset(&unit),
                0,
            ));
        }

        if options.drain_to.is_some() || options.on_insufficient_change == OnInsufficientChange::Burn {
            return Ok(Phase::Fallback);
        }

        return Err(insufficient_funds(
            Unit::Lovelace,
            min as u128,
            lovelace_leftover.max(0) as u128,
        ));
    }

    ctx.change_outputs = if let Some(unfrack_options) = options.unfrack.as_ref().filter(|_| ctx.can_unfrack) {
        unfrack::plan(&tentative, &options.change_address, options.coins_per_utxo_byte, unfrack_options)?
    } else {
        vec![ChangeOutput {
            address: options.change_address.clone(),
            assets: tentative,
        }]
    };

    tracing::debug!(outputs = ctx.change_outputs.len(), "change plan ready");

    Ok(Phase::FeeCalculation)
}

fn run_fee_calculation(
    ctx: &mut BuildContext,
    staging: &StagingTransaction,
    selected: &[AvailableUtxo],
    explicit_outputs: &[Output],
    options: &BuildOptions,
) -> Result<Phase, TxBuilderError> {
    let candidate = candidate_transaction(staging, selected, explicit_outputs, &ctx.change_outputs);
    ctx.calculated_fee = calculate_fee(&candidate, options.fee_params, options.signer_count)?;

    Ok(Phase::Balance)
}

fn run_balance(
    ctx: &mut BuildContext,
    total_input_assets: &Assets,
    total_output_assets: &Assets,
    explicit_outputs: &mut [Output],
    options: &BuildOptions,
) -> Result<Phase, TxBuilderError> {
    let change_assets = ctx
        .change_outputs
        .iter()
        .fold(Assets::new(), |acc, c| acc.add(&c.assets));

    let input_native = total_input_assets.filter(|u, _| !u.is_lovelace());
    let spent_native = total_output_assets
        .filter(|u, _| !u.is_lovelace())
        .add(&change_assets.filter(|u, _| !u.is_lovelace()));

    if input_native != spent_native {
        return Err(TxBuilderError::InternalInvariantViolated(
            "native assets not conserved at balance".into(),
        ));
    }

    let delta = total_input_assets.lovelace() as i128
        - total_output_assets.lovelace() as i128
        - change_assets.lovelace() as i128
        - ctx.calculated_fee as i128;

    if delta == 0 {
        return Ok(Phase::Complete);
    }

    if delta > 0 {
        if ctx.change_outputs.is_empty() {
            if let Some(index) = options.drain_to {
                let Some(output) = explicit_outputs.get_mut(index) else {
                    return Err(TxBuilderError::InvalidDrainIndex(index));
                };
                output.lovelace += delta as u64;
                return Ok(Phase::Complete);
            }

            if options.on_insufficient_change == OnInsufficientChange::Burn {
                ctx.calculated_fee += delta as u64;
                return Ok(Phase::Complete);
            }
        }

        return Err(TxBuilderError::InternalInvariantViolated(format!(
            "positive balance of {delta} lovelace with no drain-to or burn configured"
        )));
    }

    // delta < 0: the fee grew since change was last shaped. Shrink change
    // or grow selection.
    ctx.shortfall = -delta;
    Ok(Phase::ChangeCreation)
}

fn run_fallback(ctx: &mut BuildContext, options: &BuildOptions) -> Result<Phase, TxBuilderError> {
    if options.drain_to.is_some() || options.on_insufficient_change == OnInsufficientChange::Burn {
        tracing::warn!("change unaffordable after reselection budget, falling back to drain/burn");
        ctx.change_outputs.clear();
        return Ok(Phase::FeeCalculation);
    }

    Err(TxBuilderError::InternalInvariantViolated(
        "fallback reached without drain-to or burn configured".into(),
    ))
}

fn finalize(
    staging: StagingTransaction,
    selected: &[AvailableUtxo],
    explicit_outputs: Vec<Output>,
    ctx: &BuildContext,
) -> StagingTransaction {
    let mut tx = staging;
    tx.inputs = None;
    tx.outputs = None;

    for utxo in selected {
        tx = tx.input(Input {
            tx_hash: utxo.tx_hash,
            txo_index: utxo.output_index,
        });
    }

    for output in explicit_outputs {
        tx = tx.output(output);
    }

    for change in &ctx.change_outputs {
        tx = tx.output(change_output_to_output(change));
    }

    tx.fee(ctx.calculated_fee)
}

fn candidate_transaction(
    staging: &StagingTransaction,
    selected: &[AvailableUtxo],
    explicit_outputs: &[Output],
    change_outputs: &[ChangeOutput],
) -> StagingTransaction {
    let mut tx = staging.clone();
    tx.inputs = None;
    tx.outputs = None;

    for utxo in selected {
        tx = tx.input(Input {
            tx_hash: utxo.tx_hash,
            txo_index: utxo.output_index,
        });
    }

    for output in explicit_outputs {
        tx = tx.output(output.clone());
    }

    for change in change_outputs {
        tx = tx.output(change_output_to_output(change));
    }

    tx
}

fn change_output_to_output(change: &ChangeOutput) -> Output {
    let mut output = Output::new(change.address.0.clone(), change.assets.lovelace());

    for unit in change.assets.get_units() {
        if let Unit::Native(policy, name) = unit {
            let qty = change.assets.get_asset(unit) as u64;
            output = output
                .add_asset((*policy).into(), name.clone(), qty)
                .expect("asset names in change outputs are already length-checked");
        }
    }

    output
}

fn output_assets(output: &Output) -> Assets {
    let mut assets = Assets::from_lovelace(output.lovelace);

    if let Some(map) = &output.assets {
        for (policy, by_name) in map.iter() {
            for (name, qty) in by_name.iter() {
                assets = assets.add(&Assets::from_iter([(
                    Unit::native(*policy, name.0.clone()),
                    *qty as u128,
                )]));
            }
        }
    }

    assets
}

fn native_leftover(total_input_assets: &Assets, total_output_assets: &Assets) -> Result<Assets, TxBuilderError> {
    let input_native = total_input_assets.filter(|u, _| !u.is_lovelace());
    let output_native = total_output_assets.filter(|u, _| !u.is_lovelace());

    input_native.subtract(&output_native).map_err(|err| {
        insufficient_funds_for_assets(err.unit, err.subtracting, err.have)
    })
}

fn required_plus_shortfall(total_output_assets: &Assets, shortfall: i128) -> Assets {
    if shortfall <= 0 {
        return total_output_assets.clone();
    }

    total_output_assets.add(&Assets::from_lovelace(shortfall as u64))
}

fn positive_delta(required: &Assets, have: &Assets) -> Assets {
    let mut out = Assets::new();

    for unit in required.get_units() {
        let need = required.get_asset(unit);
        let got = have.get_asset(unit);

        if need > got {
            out = out.add(&Assets::from_iter([(unit.clone(), need - got)]));
        }
    }

    out
}

fn insufficient_funds(unit: Unit, required: u128, have: u128) -> TxBuilderError {
    TxBuilderError::InsufficientFunds(InsufficientFunds {
        unit,
        required,
        have,
        shortfall: required.saturating_sub(have),
    })
}

/// Like [`insufficient_funds`], but for a shortfall in a specific native
/// asset rather than lovelace — a distinct, separately-tagged error kind.
fn insufficient_funds_for_assets(unit: Unit, required: u128, have: u128) -> TxBuilderError {
    TxBuilderError::InsufficientFundsForAssets(InsufficientFunds {
        unit,
        required,
        have,
        shortfall: required.saturating_sub(have),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coinselect::LargestFirst;
    use corvus_addresses::Address as PallasAddress;
    use std::str::FromStr;

    fn test_address() -> Address {
        Address(
            PallasAddress::from_str(
                "addr1g9ekml92qyvzrjmawxkh64r2w5xr6mg9ngfmxh2khsmdrcudevsft64mf887333adamant",
            )
            .unwrap(),
        )
    }

    fn utxo(byte: u8, lovelace: u64) -> AvailableUtxo {
        AvailableUtxo::new(Bytes32([byte; 32]), 0, Assets::from_lovelace(lovelace))
    }

    fn default_options() -> BuildOptions {
        BuildOptions {
            change_address: test_address(),
            coin_selection: Box::new(LargestFirst),
            unfrack: None,
            drain_to: None,
            on_insufficient_change: OnInsufficientChange::Error,
            coins_per_utxo_byte: 4310,
            fee_params: LinearFeeParams {
                coefficient: 44,
                constant: 155_381,
            },
            signer_count: 1,
        }
    }

    #[test]
    fn e1_exact_balance_single_change_output() {
        let available = vec![utxo(1, 10_000_000)];
        let staging = StagingTransaction::new()
            .output(Output::new(test_address().0, 5_000_000));

        let built = build(staging, &available, &default_options()).unwrap();

        let outputs = built.outputs.unwrap();
        assert_eq!(outputs.len(), 2);

        let fee = built.fee.unwrap();
        assert!(fee >= 155_381);

        let change_lovelace = outputs[1].lovelace;
        assert_eq!(change_lovelace + fee + 5_000_000, 10_000_000);
    }

    #[test]
    fn e2_reselection_picks_a_second_utxo_when_first_leaves_too_little_change() {
        let available = vec![utxo(1, 2_500_000), utxo(2, 3_000_000)];
        let staging = StagingTransaction::new()
            .output(Output::new(test_address().0, 4_500_000));

        let built = build(staging, &available, &default_options()).unwrap();

        let inputs = built.inputs.unwrap();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn drain_to_merges_leftover_into_the_named_output() {
        let available = vec![utxo(1, 2_050_000)];
        let staging = StagingTransaction::new()
            .output(Output::new(test_address().0, 2_000_000));

        let mut options = default_options();
        options.drain_to = Some(0);
        // A flat fee keeps this scenario realizable: the real linear
        // parameters (a=44, b=155381) would exceed the entire leftover on
        // a transaction this small, and the build would correctly fail
        // with InsufficientFunds instead.
        options.fee_params = LinearFeeParams {
            coefficient: 0,
            constant: 20_000,
        };

        let built = build(staging, &available, &options).unwrap();

        let outputs = built.outputs.unwrap();
        assert_eq!(outputs.len(), 1);

        let fee = built.fee.unwrap();
        assert_eq!(fee, 20_000);
        assert_eq!(outputs[0].lovelace + fee, 2_050_000);
        assert!(outputs[0].lovelace > 2_000_000);
    }

    #[test]
    fn insufficient_funds_surfaces_as_a_tagged_error() {
        let available = vec![utxo(1, 1_000_000)];
        let staging = StagingTransaction::new()
            .output(Output::new(test_address().0, 5_000_000));

        let err = build(staging, &available, &default_options()).unwrap_err();

        assert!(matches!(err, TxBuilderError::InsufficientFunds(_)));
    }

    #[test]
    fn unfrack_subdivides_a_large_ada_only_leftover() {
        let available = vec![utxo(1, 1_000_000_000)];
        let staging = StagingTransaction::new()
            .output(Output::new(test_address().0, 10_000_000));

        let mut options = default_options();
        options.unfrack = Some(UnfrackOptions::default());

        let built = build(staging, &available, &options).unwrap();

        let outputs = built.outputs.unwrap();
        // 1 explicit payment + 7 ADA-only unfrack slices
        assert_eq!(outputs.len(), 8);
    }
}

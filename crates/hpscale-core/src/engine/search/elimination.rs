use super::{SearchObserver, SearchOutcome, initial_conformation};
use crate::core::lattice::{energy, random_move};
use crate::core::models::conformation::Conformation;
use crate::core::models::sequence::Sequence;
use crate::engine::config::{ConfigError, EliminationConfig};
use rand::Rng;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone)]
struct Member {
    conformation: Conformation,
    energy: i32,
}

/// Best-ever tracking shared by the initial population and every refill.
struct Incumbent {
    energy: i32,
    conformation: Conformation,
}

impl Incumbent {
    fn offer(&mut self, member: &Member) {
        if member.energy < self.energy {
            self.energy = member.energy;
            self.conformation = member.conformation.clone();
        }
    }
}

/// Population search with truncation selection and a paradox buffer.
///
/// Each generation sorts the population by energy (stable, so equal
/// energies keep insertion order), culls the worst `cull_count()` members,
/// copies each culled member into the buffer with probability
/// `paradox_retention_rate`, and refills back to `pop_size`. A refill slot
/// is served from the buffer with probability `reinsertion_rate`;
/// otherwise it receives one random local move of a uniformly chosen
/// survivor. The population and buffer live only for this call.
#[instrument(skip_all, name = "elimination_search", fields(length = sequence.len()))]
pub fn run<R, O>(
    sequence: &Sequence,
    config: &EliminationConfig,
    rng: &mut R,
    mut observer: O,
) -> Result<SearchOutcome, ConfigError>
where
    R: Rng + ?Sized,
    O: SearchObserver,
{
    config.validate()?;

    let mut population: Vec<Member> = Vec::with_capacity(config.pop_size);
    for _ in 0..config.pop_size {
        let conformation = initial_conformation(sequence, config.init, rng);
        observer.on_move(&conformation);
        population.push(Member {
            energy: energy(sequence, &conformation),
            conformation,
        });
    }

    let mut incumbent = Incumbent {
        energy: population[0].energy,
        conformation: population[0].conformation.clone(),
    };
    for member in &population {
        incumbent.offer(member);
    }

    let mut paradox_buffer: Vec<Conformation> = Vec::new();
    let mut paradox_retained = 0;
    let mut paradox_reinserted = 0;
    let mut offspring = 0;
    let survivors = config.pop_size - config.cull_count();

    for generation in 0..config.max_gen {
        population.sort_by_key(|member| member.energy);
        let culled = population.split_off(survivors);

        for member in culled {
            if rng.gen_bool(config.paradox_retention_rate) {
                paradox_buffer.push(member.conformation);
                paradox_retained += 1;
            }
        }

        while population.len() < config.pop_size {
            let reinsert = config.reinsertion_rate > 0.0
                && !paradox_buffer.is_empty()
                && rng.gen_bool(config.reinsertion_rate);

            let conformation = if reinsert {
                paradox_reinserted += 1;
                let pick = rng.gen_range(0..paradox_buffer.len());
                paradox_buffer.swap_remove(pick)
            } else {
                offspring += 1;
                let parent = &population[rng.gen_range(0..survivors)].conformation;
                random_move(parent, rng).unwrap_or_else(|| parent.clone())
            };

            observer.on_move(&conformation);
            let member = Member {
                energy: energy(sequence, &conformation),
                conformation,
            };
            incumbent.offer(&member);
            population.push(member);
        }

        trace!(
            generation,
            best_energy = incumbent.energy,
            buffer = paradox_buffer.len(),
            "Generation complete."
        );
        observer.on_iteration(generation, incumbent.energy);
    }

    debug!(
        best_energy = incumbent.energy,
        offspring,
        paradox_retained,
        paradox_reinserted,
        "Elimination search finished."
    );
    Ok(SearchOutcome {
        best_energy: incumbent.energy,
        best_conformation: incumbent.conformation,
        iterations: config.max_gen,
        accepted_moves: offspring,
        paradox_retained,
        paradox_reinserted,
    })
}

mod commit_happy;
mod dryrun_no_mutations;

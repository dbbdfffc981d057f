#[cfg(test)]
mod boundary;


#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod vm_invariants;
